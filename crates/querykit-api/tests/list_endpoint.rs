//! A filtered, cached list endpoint wired the way services use this crate.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::State,
    http::{Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use querykit_api::{ErrorResponse, FilterParams, Pagination, apply_middleware};
use querykit_cache::{Cache, CacheConfig, LocalCache, cache_key, route_key};
use querykit_filters::{Filter, Operator, SelectBuilder, dynamic_filters};
use serde_json::{Value, json};
use tower::ServiceExt;

struct AppState {
    cache: Arc<dyn Cache>,
    catalog: Vec<Filter>,
}

async fn list_cars(
    State(state): State<Arc<AppState>>,
    FilterParams(params): FilterParams,
) -> Result<Response, ErrorResponse> {
    let route = route_key("cars", None, &[] as &[&str]);
    let query = SelectBuilder::new(["cars.brand", "COUNT(cars.id) AS total"])
        .from("cars")
        .group_by("cars.brand");
    let (query, applied) = dynamic_filters(&state.catalog, query, &params);
    let key = cache_key(&route.route_key, &applied);

    let internal = |e: &dyn std::fmt::Display| {
        ErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    };

    if let Some(hit) = state.cache.get(&key).await.map_err(|e| internal(&e))? {
        let body: Value = serde_json::from_slice(&hit).map_err(|e| internal(&e))?;
        return Ok(([("x-cache", "hit")], Json(body)).into_response());
    }

    let built = query
        .build()
        .map_err(|e| ErrorResponse::new(StatusCode::BAD_REQUEST, e.to_string()))?;
    let limit = query.limit_value().and_then(|l| l.parse().ok()).unwrap_or(0);
    let offset = query.offset_value().and_then(|o| o.parse().ok()).unwrap_or(0);
    let body = json!({
        "sql": built.sql,
        "params": built.params.len(),
        "pagination": Pagination::from_totals(42, limit, offset),
    });

    let bytes = serde_json::to_vec(&body).map_err(|e| internal(&e))?;
    state
        .cache
        .set_key(&key, &bytes, None)
        .await
        .map_err(|e| internal(&e))?;
    state
        .cache
        .set_key_index(&route.index_key, &key)
        .await
        .map_err(|e| internal(&e))?;

    Ok(([("x-cache", "miss")], Json(body)).into_response())
}

fn app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        cache: Arc::new(LocalCache::new(CacheConfig::with_prefix("test:api"))),
        catalog: vec![
            Filter::new("brand", Operator::ILike, "cars.brand"),
            Filter::new("total", Operator::Ge, "COUNT(cars.id)"),
        ],
    });
    let router = Router::new()
        .route("/cars", get(list_cars))
        .with_state(state.clone());
    (apply_middleware(router), state)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let cache = response
        .headers()
        .get("x-cache")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, cache, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_filtered_list_is_built_and_cached() {
    let (app, _) = app();
    let uri = "/cars?BRAND=tes&total=2&limit=10&offset=20";

    let (status, cache, body) = get_json(&app, uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache.as_deref(), Some("miss"));
    assert_eq!(
        body["sql"],
        "SELECT cars.brand, COUNT(cars.id) AS total FROM cars WHERE cars.brand ILIKE ? \
         GROUP BY cars.brand HAVING COUNT(cars.id) >= ? LIMIT ? OFFSET ?"
    );
    assert_eq!(body["params"], 4);
    assert_eq!(body["pagination"]["current_page"], 3);
    assert_eq!(body["pagination"]["total_pages"], 5);

    // Same filters in a different order and case hit the same cache entry.
    let (_, cache, cached_body) = get_json(&app, "/cars?offset=20&limit=10&total=2&brand=tes").await;
    assert_eq!(cache.as_deref(), Some("hit"));
    assert_eq!(cached_body, body);
}

#[tokio::test]
async fn test_index_invalidation_evicts_filtered_variants() {
    let (app, state) = app();
    get_json(&app, "/cars?brand=a").await;
    get_json(&app, "/cars?brand=b").await;
    get_json(&app, "/cars").await;

    let removed = state.cache.delete_cache_index("cars").await.unwrap();
    assert_eq!(removed, 4);

    let (_, cache, _) = get_json(&app, "/cars?brand=a").await;
    assert_eq!(cache.as_deref(), Some("miss"));
}

#[tokio::test]
async fn test_cors_headers_are_applied() {
    let (app, _) = app();
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/cars")
                .header(header::ORIGIN, "https://example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let methods = headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(methods.contains("DELETE"));
    let allowed = headers
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    assert!(allowed.contains("authorization"));
    assert!(allowed.contains("content-type"));
}

#[tokio::test]
async fn test_builder_errors_become_error_responses() {
    let state = Arc::new(AppState {
        cache: Arc::new(LocalCache::new(CacheConfig::with_prefix("test:errors"))),
        catalog: vec![Filter::new("id", Operator::Ne, "cars.id")],
    });
    let router = apply_middleware(
        Router::new()
            .route("/cars", get(list_cars))
            .with_state(state),
    );

    let ids: String = (0..101).map(|i| format!("id={i}&")).collect();
    let (status, _, body) = get_json(&router, &format!("/cars?{ids}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["message"].as_str().unwrap().starts_with("Query too complex"));
}
