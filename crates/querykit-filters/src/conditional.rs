//! Turning validated parameters into clause-tagged predicates.

use crate::aggregate::AggregateClassifier;
use crate::filter::{Filter, Operator};
use crate::params::QueryParams;
use crate::sql_builder::Predicate;
use crate::validator::{ParamSource, ValidatedParam, validate_params};
use crate::value::FilterValue;

/// Clause a conditional belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseTarget {
    /// Row filter (WHERE)
    Where,
    /// Group filter (HAVING)
    Having,
    Limit,
    Offset,
}

/// One predicate with its target clause and the request values behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub predicate: Predicate,
    pub target: ClauseTarget,
    /// Source values in wire form, after wildcard injection
    pub values: Vec<String>,
}

impl Conditional {
    pub fn new(predicate: Predicate, target: ClauseTarget, values: Vec<String>) -> Self {
        Self {
            predicate,
            target,
            values,
        }
    }
}

/// Build conditionals for every catalog filter present in `params`, using
/// `classifier` to decide between WHERE and HAVING.
///
/// Per filter, in order of precedence:
/// 1. a NULL sentinel anywhere in the values yields one `IS [NOT] NULL`
///    row predicate and nothing else;
/// 2. `IN` yields one set-membership row predicate over all values;
/// 3. `limit`/`offset` yield one pagination directive bound to the first value;
/// 4. anything else fans out into one predicate per value, in HAVING when the
///    field is an aggregate and in WHERE otherwise.
///
/// Callers must not rely on the relative order of different filters.
pub fn build_filter_conditions_with(
    classifier: &AggregateClassifier,
    catalog: &[Filter],
    params: &QueryParams,
) -> Vec<Conditional> {
    let mut conditionals = Vec::new();
    for param in &validate_params(catalog, params) {
        push_conditionals(classifier, param, &mut conditionals);
    }
    conditionals
}

/// [`build_filter_conditions_with`] using the default aggregate vocabulary.
pub fn build_filter_conditions(catalog: &[Filter], params: &QueryParams) -> Vec<Conditional> {
    build_filter_conditions_with(AggregateClassifier::shared(), catalog, params)
}

fn push_conditionals(
    classifier: &AggregateClassifier,
    param: &ValidatedParam<'_>,
    out: &mut Vec<Conditional>,
) {
    let filter = match param.source {
        ParamSource::Filter(filter) => filter,
        ParamSource::Limit => return push_bound(param, ClauseTarget::Limit, out),
        ParamSource::Offset => return push_bound(param, ClauseTarget::Offset, out),
    };

    if let Some(sentinel) = param.null_check() {
        let field = filter.db_field.clone();
        let predicate = match sentinel {
            FilterValue::IsNotNull => Predicate::IsNotNull { field },
            _ => Predicate::IsNull { field },
        };
        out.push(Conditional::new(
            predicate,
            ClauseTarget::Where,
            param.raw_values(),
        ));
        return;
    }

    if filter.operator == Operator::In {
        let values = param.raw_values();
        out.push(Conditional::new(
            Predicate::in_list(filter.db_field.clone(), values.clone()),
            ClauseTarget::Where,
            values,
        ));
        return;
    }

    let target = if classifier.is_aggregate(&filter.db_field) {
        ClauseTarget::Having
    } else {
        ClauseTarget::Where
    };
    for value in &param.values {
        let value = value.raw().to_string();
        out.push(Conditional::new(
            Predicate::compare(filter.db_field.clone(), filter.operator, value.clone()),
            target,
            vec![value],
        ));
    }
}

fn push_bound(param: &ValidatedParam<'_>, target: ClauseTarget, out: &mut Vec<Conditional>) {
    if let Some(first) = param.values.first() {
        let value = first.raw().to_string();
        out.push(Conditional::new(
            Predicate::Bound(value.clone()),
            target,
            vec![value],
        ));
    }
}
