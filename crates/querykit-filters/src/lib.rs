//! Dynamic predicate building for SQL list endpoints.
//!
//! An endpoint declares a catalog of [`Filter`]s it accepts. For each request
//! the engine matches the query parameters against that catalog, turns them
//! into bound predicates placed in WHERE or HAVING, applies pagination, and
//! reports the applied filters as a stable string for cache keys.
//!
//! ```
//! use querykit_filters::{Filter, Operator, QueryParams, SelectBuilder, dynamic_filters};
//!
//! let catalog = vec![
//!     Filter::new("country", Operator::Eq, "country.name"),
//!     Filter::new("stars", Operator::In, "booking.stars"),
//! ];
//! let params = QueryParams::parse_query("country=Greece&stars=4&stars=5&limit=20");
//! let query = SelectBuilder::new(["country.name"]).from("country");
//!
//! let (query, applied) = dynamic_filters(&catalog, query, &params);
//! let built = query.build().unwrap();
//!
//! assert_eq!(
//!     built.sql,
//!     "SELECT country.name FROM country WHERE country.name = ? AND booking.stars IN (?,?) LIMIT ?"
//! );
//! assert_eq!(applied.get("booking.stars IN").as_deref(), Some("4,5"));
//! ```

pub mod aggregate;
pub mod applier;
pub mod combinator;
pub mod conditional;
pub mod error;
pub mod filter;
pub mod ordering;
pub mod params;
pub mod sql_builder;
pub mod validator;
pub mod value;

pub use aggregate::{AggregateClassifier, DEFAULT_AGGREGATE_FUNCTIONS, are_filters_aggregate, is_aggregate};
pub use applier::{AppliedFilters, FilterEngine, applied_filters, dynamic_filters};
pub use combinator::{extend_filter_pair, extend_filters};
pub use conditional::{ClauseTarget, Conditional, build_filter_conditions, build_filter_conditions_with};
pub use error::FilterError;
pub use filter::{Filter, LIMIT, OFFSET, Operator};
pub use ordering::{OrderBy, is_field_filter, order_validation};
pub use params::QueryParams;
pub use sql_builder::{BuiltQuery, Placeholder, Predicate, SelectBuilder, SortOrder, SqlValue};
pub use validator::{ParamSource, ValidatedParam, ValidatedParams, validate_params, wrap_wildcards};
pub use value::{FilterValue, NOT_NULL_TOKEN, NULL_TOKEN};
