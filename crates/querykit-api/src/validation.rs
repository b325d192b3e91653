//! Mapping database errors to user-facing responses.

use axum::http::StatusCode;
use std::fmt;

/// Map a database error to a status code and a message safe to show to
/// users. The underlying error is always logged.
///
/// MySQL error codes are recognised in the error text: `1062` duplicate
/// entry, `1452` foreign key, `1406` data too long, `1048` column cannot be
/// null. `no rows in result set` maps to 404.
pub fn database_validation(err: &dyn fmt::Display) -> (StatusCode, &'static str) {
    let text = err.to_string();
    tracing::error!(error = %text, "database error");

    if text.contains("1062") {
        (StatusCode::CONFLICT, "Asset already exists")
    } else if text.contains("1452") {
        (StatusCode::BAD_REQUEST, "Invalid related resource")
    } else if text.contains("1406") {
        (StatusCode::BAD_REQUEST, "Data too long for column")
    } else if text.contains("1048") {
        (StatusCode::BAD_REQUEST, "Column cannot be null")
    } else if text.contains("no rows in result set") {
        (StatusCode::NOT_FOUND, "No data for specified request")
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred",
        )
    }
}
