use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::domain::error::DomainError;

/// Error returned by handlers; renders `{"success": false, "error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => ApiError::BadRequest(msg),
            DomainError::Parse(msg) => ApiError::BadRequest(format!("Malformed payload: {msg}")),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::Solver(msg) => {
                error!(reason = %msg, "solver failure");
                ApiError::Internal("Failed to compute recommendations".into())
            }
            DomainError::Database(msg) => {
                error!(reason = %msg, "database failure");
                ApiError::Internal("Database error".into())
            }
            DomainError::Cancelled => ApiError::Unavailable("Request was cancelled".into()),
            DomainError::Feed(msg) => ApiError::Unavailable(format!("Price feed unavailable: {msg}")),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(format!("Malformed payload: {err}"))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
