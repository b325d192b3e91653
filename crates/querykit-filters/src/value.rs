//! Filter values as received from a request.
//!
//! The wire protocol reserves two strings to ask for NULL checks. They are
//! parsed into dedicated variants here so nothing downstream compares
//! against magic strings.

use std::fmt;

/// Wire token requesting `IS NULL`.
pub const NULL_TOKEN: &str = "__NULL__";

/// Wire token requesting `IS NOT NULL`.
pub const NOT_NULL_TOKEN: &str = "__NOT_NULL__";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterValue {
    Literal(String),
    IsNull,
    IsNotNull,
}

impl FilterValue {
    /// Parse a raw request value, recognising the sentinel tokens.
    pub fn parse(raw: &str) -> Self {
        match raw {
            NULL_TOKEN => Self::IsNull,
            NOT_NULL_TOKEN => Self::IsNotNull,
            other => Self::Literal(other.to_string()),
        }
    }

    /// The value in its wire form.
    pub fn raw(&self) -> &str {
        match self {
            Self::Literal(s) => s,
            Self::IsNull => NULL_TOKEN,
            Self::IsNotNull => NOT_NULL_TOKEN,
        }
    }

    /// Human-readable form for reporting: the literal itself, `NULL` or `Not NULL`.
    pub fn label(&self) -> &str {
        match self {
            Self::Literal(s) => s,
            Self::IsNull => "NULL",
            Self::IsNotNull => "Not NULL",
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }
}

impl From<&str> for FilterValue {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sentinels() {
        assert_eq!(FilterValue::parse("__NULL__"), FilterValue::IsNull);
        assert_eq!(FilterValue::parse("__NOT_NULL__"), FilterValue::IsNotNull);
        assert_eq!(
            FilterValue::parse("__null__"),
            FilterValue::Literal("__null__".to_string())
        );
    }

    #[test]
    fn test_labels_and_raw() {
        assert_eq!(FilterValue::IsNull.label(), "NULL");
        assert_eq!(FilterValue::IsNotNull.label(), "Not NULL");
        assert_eq!(FilterValue::IsNull.raw(), NULL_TOKEN);
        assert_eq!(FilterValue::IsNotNull.raw(), NOT_NULL_TOKEN);

        let lit = FilterValue::from("Greece");
        assert_eq!(lit.label(), "Greece");
        assert_eq!(lit.raw(), "Greece");
        assert_eq!(lit.as_literal(), Some("Greece"));
        assert!(!lit.is_sentinel());
        assert!(FilterValue::IsNull.is_sentinel());
    }
}
