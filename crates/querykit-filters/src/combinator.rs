//! Merging filter catalogs declared by separate route components.
//!
//! Lists are emitted shortest first. The order never changes which rows match,
//! but [`order_validation`](crate::order_validation) falls back to the first
//! filter of the merged catalog, so it must stay stable.

use crate::filter::Filter;

/// Flatten several filter lists into one catalog, shortest list first.
///
/// Lists of equal length keep the order they were given in.
pub fn extend_filters<L>(lists: impl IntoIterator<Item = L>) -> Vec<Filter>
where
    L: AsRef<[Filter]>,
{
    let mut lists: Vec<L> = lists.into_iter().collect();
    lists.sort_by_key(|list| list.as_ref().len());
    lists
        .iter()
        .flat_map(|list| list.as_ref().iter().cloned())
        .collect()
}

/// Merge two filter lists: the shorter one goes first, and on a tie `b`
/// goes before `a`.
pub fn extend_filter_pair(a: &[Filter], b: &[Filter]) -> Vec<Filter> {
    let (first, second) = if a.len() < b.len() { (a, b) } else { (b, a) };
    first.iter().chain(second).cloned().collect()
}
