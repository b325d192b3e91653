use std::time::Instant;

use axum::Router;
use axum::{
    body::Body,
    http::{Method, Request, header},
    middleware::{self, Next},
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};

/// Logs method, path, status and elapsed time of every request.
pub async fn logging(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let res = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = res.status().as_u16(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "request"
    );
    res
}

/// CORS for all routes: any origin, the CRUD methods, and the
/// `Content-Type` and `Authorization` request headers.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Wrap `router` with request logging (outermost) and CORS.
pub fn apply_middleware<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(cors_layer())
        .layer(middleware::from_fn(logging))
}
