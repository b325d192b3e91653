//! Error types for catalog declaration, ordering and SQL rendering.
//!
//! Request handling itself never fails: unknown parameters are ignored and
//! values are passed through to the database untouched. The variants below
//! cover programmer-declared input (catalogs, table names) and the two
//! places where a request can push the builder outside its limits.

use thiserror::Error;

/// Errors raised by the filter engine and the select builder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown filter operator '{0}'")]
    UnknownOperator(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Cannot resolve an order-by field against an empty filter catalog")]
    EmptyCatalog,

    #[error("Query too complex: {0}")]
    QueryTooComplex(String),

    #[error("Missing FROM table")]
    MissingTable,
}

impl FilterError {
    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier(name.into())
    }

    pub fn too_complex(message: impl Into<String>) -> Self {
        Self::QueryTooComplex(message.into())
    }
}
