//! Applying request filters to a query and reporting what was applied.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use url::form_urlencoded;

use crate::aggregate::AggregateClassifier;
use crate::conditional::{ClauseTarget, Conditional, build_filter_conditions_with};
use crate::filter::{Filter, LIMIT, OFFSET};
use crate::params::QueryParams;
use crate::sql_builder::{Predicate, SelectBuilder};
use crate::validator::{ValidatedParams, validate_params};

/// Filters applied to a query, keyed by field expression and operator.
///
/// Keys follow the shape of the predicate:
/// - `field` for `IS NULL` / `IS NOT NULL` checks, valued with the check
/// - `field IN` for set membership, valued with the set
/// - `field op` for comparisons, one value per fanned-out predicate
/// - `limit` and `offset` for pagination
///
/// Each conditional contributes one group of values under its key. Entries
/// are kept sorted so the same request always yields the same
/// [`to_key_fragment`](Self::to_key_fragment).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedFilters(BTreeMap<String, Vec<Vec<String>>>);

impl AppliedFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the report for a set of conditionals.
    pub fn from_conditionals<'a>(conditionals: impl IntoIterator<Item = &'a Conditional>) -> Self {
        let mut applied = Self::new();
        for conditional in conditionals {
            applied.record(conditional);
        }
        applied
    }

    fn record(&mut self, conditional: &Conditional) {
        let (key, group) = match (&conditional.predicate, conditional.target) {
            (Predicate::Bound(value), ClauseTarget::Limit) => (LIMIT.to_string(), vec![value.clone()]),
            (Predicate::Bound(value), ClauseTarget::Offset) => {
                (OFFSET.to_string(), vec![value.clone()])
            }
            (Predicate::IsNull { field }, _) => (field.clone(), vec!["IS NULL".to_string()]),
            (Predicate::IsNotNull { field }, _) => (field.clone(), vec!["IS NOT NULL".to_string()]),
            (Predicate::InList { field, values }, _) => (format!("{field} IN"), values.clone()),
            (Predicate::Compare { field, op, value }, _) => {
                (format!("{field} {op}"), vec![value.clone()])
            }
            (Predicate::Bound(_) | Predicate::Raw { .. }, _) => return,
        };
        self.0.entry(key).or_default().push(group);
    }

    /// Values recorded under `key`, comma-joined.
    pub fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|groups| display_values(groups))
    }

    /// Value groups recorded under `key`, one per conditional.
    pub fn groups(&self, key: &str) -> Option<&[Vec<String>]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Keys with their comma-joined values, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, String)> {
        self.0.iter().map(|(k, groups)| (k.as_str(), display_values(groups)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as form-encoded `key=value` pairs joined by `&`, sorted by key,
    /// one pair per value group.
    ///
    /// Items of a group are form-encoded before being joined with `,`, so the
    /// fragment is distinct for every distinct set of applied filters.
    ///
    /// Example: `booking.stars+IN=1%2C2&country.name+%3D=Greece&limit=50`
    pub fn to_key_fragment(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, groups) in &self.0 {
            for group in groups {
                let value = group
                    .iter()
                    .map(|item| form_urlencoded::byte_serialize(item.as_bytes()).collect::<String>())
                    .collect::<Vec<_>>()
                    .join(",");
                serializer.append_pair(key, &value);
            }
        }
        serializer.finish()
    }

    /// Flat map of keys to comma-joined values.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

fn display_values(groups: &[Vec<String>]) -> String {
    groups.iter().flatten().map(String::as_str).collect::<Vec<_>>().join(",")
}

impl Serialize for AppliedFilters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Predicate engine bound to an aggregate vocabulary.
///
/// Engines are immutable and cheap to share; build one per vocabulary and
/// reuse it across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterEngine {
    classifier: AggregateClassifier,
}

impl FilterEngine {
    pub fn new(classifier: AggregateClassifier) -> Self {
        Self { classifier }
    }

    /// Engine recognising the given aggregate function names.
    pub fn with_aggregate_functions<I, S>(functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(AggregateClassifier::new(functions))
    }

    pub fn classifier(&self) -> &AggregateClassifier {
        &self.classifier
    }

    pub fn validate_params<'c>(
        &self,
        catalog: &'c [Filter],
        params: &QueryParams,
    ) -> ValidatedParams<'c> {
        validate_params(catalog, params)
    }

    pub fn build_filter_conditions(
        &self,
        catalog: &[Filter],
        params: &QueryParams,
    ) -> Vec<Conditional> {
        build_filter_conditions_with(&self.classifier, catalog, params)
    }

    /// Report the filters a request would apply, without touching a query.
    pub fn applied_filters(&self, catalog: &[Filter], params: &QueryParams) -> AppliedFilters {
        AppliedFilters::from_conditionals(&self.build_filter_conditions(catalog, params))
    }

    /// Apply every filter present in `params` to `query`.
    ///
    /// Row predicates and group predicates are each AND-combined; `limit`
    /// and `offset` set the query's pagination. Returns the augmented query
    /// and the report of what was applied.
    pub fn dynamic_filters(
        &self,
        catalog: &[Filter],
        query: SelectBuilder,
        params: &QueryParams,
    ) -> (SelectBuilder, AppliedFilters) {
        let conditionals = self.build_filter_conditions(catalog, params);
        let applied = AppliedFilters::from_conditionals(&conditionals);

        let mut query = query;
        for Conditional {
            predicate, target, ..
        } in conditionals
        {
            query = match (target, predicate) {
                (ClauseTarget::Where, predicate) => query.where_predicate(predicate),
                (ClauseTarget::Having, predicate) => query.having_predicate(predicate),
                (ClauseTarget::Limit, Predicate::Bound(value)) => query.limit(value),
                (ClauseTarget::Offset, Predicate::Bound(value)) => query.offset(value),
                (ClauseTarget::Limit | ClauseTarget::Offset, _) => query,
            };
        }

        tracing::debug!(
            row_filters = query.row_filters().len(),
            group_filters = query.group_filters().len(),
            applied = %applied.to_key_fragment(),
            "dynamic filters applied"
        );

        (query, applied)
    }
}

/// [`FilterEngine::dynamic_filters`] with the default aggregate vocabulary.
pub fn dynamic_filters(
    catalog: &[Filter],
    query: SelectBuilder,
    params: &QueryParams,
) -> (SelectBuilder, AppliedFilters) {
    FilterEngine::default().dynamic_filters(catalog, query, params)
}

/// [`FilterEngine::applied_filters`] with the default aggregate vocabulary.
pub fn applied_filters(catalog: &[Filter], params: &QueryParams) -> AppliedFilters {
    FilterEngine::default().applied_filters(catalog, params)
}
