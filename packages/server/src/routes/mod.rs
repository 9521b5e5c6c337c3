// HTTP routes
pub mod crawl;
pub mod health;

pub use crawl::*;
pub use health::*;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Errors returned to HTTP clients as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid crawl URL: {0}")]
    InvalidUrl(String),

    #[error("no running crawl with id {0}")]
    JobNotFound(uuid::Uuid),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ApiError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            ApiError::JobNotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
