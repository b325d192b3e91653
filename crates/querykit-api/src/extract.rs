//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use querykit_filters::QueryParams;
use std::convert::Infallible;
use std::ops::Deref;

/// Extracts the raw query string as case-insensitive, multi-valued
/// [`QueryParams`], ready to be matched against a filter catalog.
///
/// # Example
///
/// ```no_run
/// use querykit_api::FilterParams;
///
/// async fn list_cars(FilterParams(params): FilterParams) -> String {
///     format!("{} filters requested", params.len())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterParams(pub QueryParams);

impl<S> FromRequestParts<S> for FilterParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params = parts
            .uri
            .query()
            .map(QueryParams::parse_query)
            .unwrap_or_default();
        Ok(FilterParams(params))
    }
}

impl Deref for FilterParams {
    type Target = QueryParams;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FilterParams {
    pub fn into_inner(self) -> QueryParams {
        self.0
    }
}
