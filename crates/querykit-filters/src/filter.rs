//! Filter catalog entries.
//!
//! A [`Filter`] declares that an endpoint accepts a query parameter `name`
//! and maps it to `operator` applied on the SQL field expression `db_field`.
//! Catalogs are plain `Vec<Filter>` values built once at route registration
//! and shared read-only between requests.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aggregate;
use crate::error::FilterError;

/// Request parameter name reserved for the row limit.
pub const LIMIT: &str = "limit";

/// Request parameter name reserved for the row offset.
pub const OFFSET: &str = "offset";

/// Comparison operators a catalog filter may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operator {
    /// Equal (=)
    #[serde(rename = "=")]
    Eq,
    /// Not equal (!=)
    #[serde(rename = "!=")]
    Ne,
    /// Less than (<)
    #[serde(rename = "<")]
    Lt,
    /// Greater than (>)
    #[serde(rename = ">")]
    Gt,
    /// Less than or equal (<=)
    #[serde(rename = "<=")]
    Le,
    /// Greater than or equal (>=)
    #[serde(rename = ">=")]
    Ge,
    /// LIKE pattern match
    #[serde(rename = "LIKE")]
    Like,
    /// Case-insensitive LIKE
    #[serde(rename = "ILIKE")]
    ILike,
    /// Set membership
    #[serde(rename = "IN")]
    In,
}

impl Operator {
    /// Parse an operator from its SQL spelling, ignoring case and surrounding
    /// whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "=" => Some(Self::Eq),
            "!=" | "<>" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            ">" => Some(Self::Gt),
            "<=" => Some(Self::Le),
            ">=" => Some(Self::Ge),
            "LIKE" => Some(Self::Like),
            "ILIKE" => Some(Self::ILike),
            "IN" => Some(Self::In),
            _ => None,
        }
    }

    /// Get the SQL operator string.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Like => "LIKE",
            Self::ILike => "ILIKE",
            Self::In => "IN",
        }
    }

    /// Whether values for this operator get `%` wildcards injected.
    pub fn is_pattern(self) -> bool {
        matches!(self, Self::Like | Self::ILike)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A permitted filter for an endpoint.
///
/// Equality and hashing cover all four attributes, so two declarations that
/// differ only in `field_id` are distinct filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    /// Parameter key as seen in the request
    pub name: String,
    pub operator: Operator,
    /// Field expression the operator applies to, e.g. `country.name` or `SUM(price)`
    pub db_field: String,
    /// Opaque identifier for UI correlation; never used when building predicates
    #[serde(default)]
    pub field_id: String,
}

impl Filter {
    pub fn new(name: impl Into<String>, operator: Operator, db_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator,
            db_field: db_field.into(),
            field_id: String::new(),
        }
    }

    /// Build a filter from an operator given as text.
    pub fn parse(
        name: impl Into<String>,
        operator: &str,
        db_field: impl Into<String>,
    ) -> Result<Self, FilterError> {
        let op = Operator::parse(operator)
            .ok_or_else(|| FilterError::UnknownOperator(operator.to_string()))?;
        Ok(Self::new(name, op, db_field))
    }

    #[must_use]
    pub fn with_field_id(mut self, field_id: impl Into<String>) -> Self {
        self.field_id = field_id.into();
        self
    }

    /// Whether `db_field` is an aggregate expression under the default
    /// aggregate vocabulary.
    pub fn is_aggregate(&self) -> bool {
        aggregate::is_aggregate(&self.db_field)
    }
}
