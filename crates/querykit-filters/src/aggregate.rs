//! Aggregate field detection.
//!
//! A predicate on an aggregate expression such as `SUM(price)` must go into
//! the HAVING clause. Detection is a case-insensitive prefix match of a
//! known function name immediately followed by `(`; substrings do not count,
//! so `sum_prices` and `MAXvalue` stay in WHERE.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::filter::Filter;

/// Aggregate functions recognised when no vocabulary is configured.
pub const DEFAULT_AGGREGATE_FUNCTIONS: [&str; 6] =
    ["count", "sum", "min", "max", "stddev", "variance"];

static DEFAULT_CLASSIFIER: LazyLock<AggregateClassifier> =
    LazyLock::new(AggregateClassifier::default);

/// Immutable set of aggregate function names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateClassifier {
    functions: BTreeSet<String>,
}

impl AggregateClassifier {
    /// Create a classifier for the given function names. Names are trimmed
    /// and lowercased; empty names are ignored.
    pub fn new<I, S>(functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let functions = functions
            .into_iter()
            .map(|f| f.as_ref().trim().to_lowercase())
            .filter(|f| !f.is_empty())
            .collect();
        Self { functions }
    }

    /// Shared classifier using [`DEFAULT_AGGREGATE_FUNCTIONS`].
    pub fn shared() -> &'static AggregateClassifier {
        &DEFAULT_CLASSIFIER
    }

    pub fn is_aggregate(&self, field: &str) -> bool {
        let lower = field.to_lowercase();
        self.functions.iter().any(|function| {
            lower
                .strip_prefix(function.as_str())
                .is_some_and(|rest| rest.starts_with('('))
        })
    }

    /// True if any filter in the sequence targets an aggregate field.
    pub fn are_filters_aggregate(&self, filters: &[Filter]) -> bool {
        filters.iter().any(|f| self.is_aggregate(&f.db_field))
    }

    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(String::as_str)
    }
}

impl Default for AggregateClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_AGGREGATE_FUNCTIONS)
    }
}

/// [`AggregateClassifier::is_aggregate`] with the default vocabulary.
pub fn is_aggregate(field: &str) -> bool {
    DEFAULT_CLASSIFIER.is_aggregate(field)
}

/// [`AggregateClassifier::are_filters_aggregate`] with the default vocabulary.
pub fn are_filters_aggregate(filters: &[Filter]) -> bool {
    DEFAULT_CLASSIFIER.are_filters_aggregate(filters)
}
