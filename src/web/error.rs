//! Error type mapping domain failures to the JSON error envelope.

use crate::domain::error::DomainError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    NotFound(String),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::Domain(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Domain(e @ DomainError::InvalidInput(_))
            | ApiError::Domain(e @ DomainError::Csv(_))
            | ApiError::Domain(e @ DomainError::Parse(_))
            | ApiError::Domain(e @ DomainError::Config(_)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", e.to_string())
            }
            ApiError::Domain(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                e.to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
        };

        let body = json!({
            "data": null,
            "errors": [{
                "code": code,
                "message": message,
            }],
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (status, axum::Json(body)).into_response()
    }
}
