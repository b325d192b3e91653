//! axum glue for querykit services: query-parameter extraction, middleware,
//! permission checks, standard response bodies and error mapping.

pub mod acl;
pub mod encoding;
pub mod extract;
pub mod middleware;
pub mod observability;
pub mod response;
pub mod validation;

pub use acl::PermissionSet;
pub use encoding::{APPLICATION_JSON, accepted_encoding, data_encode, decode_body};
pub use extract::FilterParams;
pub use middleware::{apply_middleware, cors_layer, logging};
pub use observability::{apply_logging_level, init_tracing, init_tracing_with_level};
pub use response::{
    CreatedAssetResponse, DeletedCacheResponse, DistinctFieldNames, DistinctFieldNamesResponse,
    ErrorResponse, Ids, Pagination,
};
pub use validation::database_validation;
