//! Standard response bodies for list, create and cache endpoints.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Error body: `{"status": 404, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// Error body for a database failure, see [`database_validation`](crate::database_validation).
    pub fn from_database_error(err: &dyn std::fmt::Display) -> Self {
        let (status, message) = crate::validation::database_validation(err);
        Self::new(status, message)
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Pagination block for list responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_assets: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub next_page: bool,
    pub limit: u64,
}

impl Pagination {
    /// Derive the pagination block from a total row count and the applied
    /// limit and offset. A zero limit means "everything on one page".
    pub fn from_totals(total: u64, limit: u64, offset: u64) -> Self {
        if limit == 0 {
            return Self {
                total_assets: total,
                current_page: 1,
                total_pages: u64::from(total > 0),
                next_page: false,
                limit,
            };
        }

        let total_pages = total.div_ceil(limit);
        let current_page = offset / limit + 1;
        Self {
            total_assets: total,
            current_page,
            total_pages,
            next_page: current_page < total_pages,
            limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedCacheResponse {
    pub status: u16,
    pub keys_flushed: usize,
}

impl DeletedCacheResponse {
    pub fn new(keys_flushed: usize) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            keys_flushed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedAssetResponse {
    pub status: u16,
    pub asset_id: Option<i64>,
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl CreatedAssetResponse {
    pub fn new(asset_id: Option<i64>) -> Self {
        Self {
            status: StatusCode::CREATED.as_u16(),
            asset_id,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

impl IntoResponse for CreatedAssetResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

/// Distinct values of a field with their counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistinctFieldNamesResponse {
    pub status: u16,
    pub total: usize,
    pub data: Vec<DistinctFieldNames>,
}

impl DistinctFieldNamesResponse {
    pub fn new(data: Vec<DistinctFieldNames>) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            total: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistinctFieldNames {
    pub id: String,
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ids {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pagination_from_totals() {
        let p = Pagination::from_totals(95, 10, 0);
        assert_eq!(p.total_pages, 10);
        assert_eq!(p.current_page, 1);
        assert!(p.next_page);

        let last = Pagination::from_totals(95, 10, 90);
        assert_eq!(last.current_page, 10);
        assert!(!last.next_page);

        let empty = Pagination::from_totals(0, 10, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.next_page);

        let unlimited = Pagination::from_totals(7, 0, 0);
        assert_eq!(unlimited.total_pages, 1);
        assert_eq!(unlimited.current_page, 1);
    }

    #[test]
    fn test_pagination_serialized_field_names() {
        let json = serde_json::to_value(Pagination::from_totals(20, 10, 10)).unwrap();
        assert_eq!(
            json,
            json!({
                "total_assets": 20,
                "current_page": 2,
                "total_pages": 2,
                "next_page": false,
                "limit": 10
            })
        );
    }

    #[test]
    fn test_created_asset_serializes_date() {
        let created = CreatedAssetResponse::new(Some(42));
        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["status"], 201);
        assert_eq!(json["asset_id"], 42);
        assert!(json["date"].as_str().is_some_and(|d| d.contains('T')));
    }

    #[test]
    fn test_distinct_field_names_total() {
        let response = DistinctFieldNamesResponse::new(vec![
            DistinctFieldNames {
                id: "1".into(),
                name: "Greece".into(),
                count: 3,
            },
            DistinctFieldNames {
                id: "2".into(),
                name: "France".into(),
                count: 1,
            },
        ]);
        assert_eq!(response.total, 2);
        assert_eq!(response.status, 200);
    }

    #[test]
    fn test_error_response_into_response() {
        let response = ErrorResponse::new(StatusCode::CONFLICT, "Asset already exists").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let odd = ErrorResponse {
            status: 42,
            message: "?".into(),
        };
        assert_eq!(odd.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
