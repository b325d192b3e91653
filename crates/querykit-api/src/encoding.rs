//! Content negotiation and request body decoding. Only JSON is supported.

use axum::http::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::response::ErrorResponse;

pub const APPLICATION_JSON: &str = "application/json";

/// Content type to answer with for an `Accept` value: JSON, whatever was
/// asked for.
pub fn accepted_encoding(accept: &str) -> &'static str {
    let accept = accept.trim().to_ascii_lowercase();
    if accept != APPLICATION_JSON && !accept.is_empty() {
        tracing::debug!(accept = %accept, "unsupported encoding requested, using JSON");
    }
    APPLICATION_JSON
}

/// Encode `data` for the given `Accept` value, returning the body and its
/// content type.
pub fn data_encode<T: Serialize>(
    accept: &str,
    data: &T,
) -> Result<(Vec<u8>, &'static str), serde_json::Error> {
    let content_type = accepted_encoding(accept);
    Ok((serde_json::to_vec(data)?, content_type))
}

/// Decode a JSON request body, translating failures into a 400 body that
/// points at the problem.
pub fn decode_body<T: DeserializeOwned>(
    content_type: &str,
    body: &[u8],
) -> Result<T, ErrorResponse> {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if media_type != APPLICATION_JSON {
        return Err(ErrorResponse::new(
            StatusCode::BAD_REQUEST,
            "failed to decode body for specified Content-Type",
        ));
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ErrorResponse::new(
            StatusCode::BAD_REQUEST,
            "Request body must not be empty",
        ));
    }

    serde_json::from_slice(body).map_err(|e| {
        use serde_json::error::Category;
        let message = match e.classify() {
            Category::Syntax => format!(
                "Request body contains badly-formed JSON (at line {} column {})",
                e.line(),
                e.column()
            ),
            Category::Eof => "Request body contains badly-formed JSON".to_string(),
            Category::Data => format!("Request body contains an invalid value: {e}"),
            Category::Io => e.to_string(),
        };
        ErrorResponse::new(StatusCode::BAD_REQUEST, message)
    })
}
