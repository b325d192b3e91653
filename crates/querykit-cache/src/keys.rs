//! Route and response cache keys.
//!
//! Responses are cached under a route key extended with the applied filters.
//! Every cached key is also recorded in the index of its top-level resource,
//! so a write to `cars/1` can evict `cars:1`, `cars:1:colors` and every
//! filtered variant of them in one call.

use querykit_filters::AppliedFilters;

/// Keys derived for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteKey {
    /// Key of the route itself, including sub-resource segments
    pub route_key: String,
    /// Index the route key is recorded in: the route and asset id only
    pub index_key: String,
}

/// Derive route and index keys.
///
/// - `("cars", None, [])` gives `cars` / `cars`
/// - `("cars", Some(1), [])` gives `cars:1` / `cars:1`
/// - `("cars", Some(1), ["colors"])` gives `cars:1:colors` / `cars:1`
///
/// Deeper routes such as `cars/{id}/colors/{color}` should keep the
/// first-level index and extend only the route key.
pub fn route_key<S: AsRef<str>>(route: &str, asset_id: Option<i64>, args: &[S]) -> RouteKey {
    let mut route_key = route.to_string();
    if let Some(id) = asset_id {
        route_key.push(':');
        route_key.push_str(&id.to_string());
    }
    let index_key = route_key.clone();

    for arg in args {
        route_key.push(':');
        route_key.push_str(arg.as_ref());
    }

    RouteKey {
        route_key,
        index_key,
    }
}

/// Cache key for a response: the route key, followed by `?` and the applied
/// filter fragment when any filters were applied.
pub fn cache_key(route_key: &str, applied: &AppliedFilters) -> String {
    let fragment = applied.to_key_fragment();
    if fragment.is_empty() {
        route_key.to_string()
    } else {
        format!("{route_key}?{fragment}")
    }
}
