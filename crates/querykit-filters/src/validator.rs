//! Matching request parameters against a filter catalog.

use crate::filter::{Filter, LIMIT, OFFSET};
use crate::params::QueryParams;
use crate::value::FilterValue;

/// Where a validated parameter came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSource<'c> {
    /// A filter declared in the catalog
    Filter(&'c Filter),
    /// The implicit `limit` parameter
    Limit,
    /// The implicit `offset` parameter
    Offset,
}

impl ParamSource<'_> {
    /// Request parameter name this source answers to.
    pub fn name(&self) -> &str {
        match self {
            Self::Filter(f) => &f.name,
            Self::Limit => LIMIT,
            Self::Offset => OFFSET,
        }
    }

    pub fn filter(&self) -> Option<&Filter> {
        match self {
            Self::Filter(f) => Some(f),
            _ => None,
        }
    }
}

/// A catalog entry with the values the request supplied for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedParam<'c> {
    pub source: ParamSource<'c>,
    pub values: Vec<FilterValue>,
}

impl ValidatedParam<'_> {
    /// Last sentinel in the value list, scanning every value.
    pub fn null_check(&self) -> Option<&FilterValue> {
        self.values.iter().rev().find(|v| v.is_sentinel())
    }

    /// Values in their wire form.
    pub fn raw_values(&self) -> Vec<String> {
        self.values.iter().map(|v| v.raw().to_string()).collect()
    }
}

/// Request values matched to catalog entries, in catalog order with the
/// pagination parameters last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedParams<'c> {
    params: Vec<ValidatedParam<'c>>,
}

impl<'c> ValidatedParams<'c> {
    pub fn iter(&self) -> std::slice::Iter<'_, ValidatedParam<'c>> {
        self.params.iter()
    }

    /// Look up the entry for a request parameter name.
    pub fn get(&self, name: &str) -> Option<&ValidatedParam<'c>> {
        self.params
            .iter()
            .find(|p| p.source.name().eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<'c> IntoIterator for ValidatedParams<'c> {
    type Item = ValidatedParam<'c>;
    type IntoIter = std::vec::IntoIter<ValidatedParam<'c>>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.into_iter()
    }
}

impl<'a, 'c> IntoIterator for &'a ValidatedParams<'c> {
    type Item = &'a ValidatedParam<'c>;
    type IntoIter = std::slice::Iter<'a, ValidatedParam<'c>>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Match `params` against `catalog`.
///
/// Parameters unknown to the catalog are ignored and filters without values
/// are dropped. `limit` and `offset` are always accepted as pagination, and
/// catalog filters carrying either name are ignored. Values for `LIKE` and
/// `ILIKE` filters are wrapped in `%` wildcards; everything else passes
/// through untouched.
pub fn validate_params<'c>(catalog: &'c [Filter], params: &QueryParams) -> ValidatedParams<'c> {
    let sources = catalog
        .iter()
        .filter(|f| {
            let reserved = is_pagination_name(&f.name);
            if reserved {
                tracing::debug!(filter = %f.name, "filter shadows a pagination parameter, ignored");
            }
            !reserved
        })
        .map(ParamSource::Filter)
        .chain([ParamSource::Limit, ParamSource::Offset]);

    let mut validated = Vec::new();
    for source in sources {
        let values = match params.get(source.name()) {
            Some(values) if !values.is_empty() => values,
            _ => continue,
        };

        let values: Vec<FilterValue> = values.iter().map(|v| FilterValue::parse(v)).collect();
        if values.iter().any(FilterValue::is_sentinel) {
            tracing::debug!(
                filter = %source.name(),
                "null sentinel supplied, operator overridden"
            );
        }

        validated.push(ValidatedParam { source, values });
    }

    validate_values(&mut validated);
    ValidatedParams { params: validated }
}

fn is_pagination_name(name: &str) -> bool {
    name.eq_ignore_ascii_case(LIMIT) || name.eq_ignore_ascii_case(OFFSET)
}

fn validate_values(params: &mut [ValidatedParam<'_>]) {
    for param in params {
        let Some(filter) = param.source.filter() else {
            continue;
        };
        if !filter.operator.is_pattern() {
            continue;
        }
        for value in &mut param.values {
            if let FilterValue::Literal(s) = value {
                *s = wrap_wildcards(s);
            }
        }
    }
}

/// Wrap a value in `%...%` unless it is empty or already wrapped.
pub fn wrap_wildcards(value: &str) -> String {
    let already_wrapped = value.len() >= 2 && value.starts_with('%') && value.ends_with('%');
    if value.is_empty() || already_wrapped {
        value.to_string()
    } else {
        format!("%{value}%")
    }
}
