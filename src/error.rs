use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Bookmark not found")]
    BookmarkNotFound,

    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Not found")]
    NotFound,

    #[error("Bookmark store is unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl AppError {
    /// Whether the caller can fix this by changing the request.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::InvalidJson | AppError::InvalidUrl
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Io(e) => {
                tracing::error!("Storage I/O error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error")
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error")
            }
            AppError::Validation(msg) => {
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::InvalidJson => (StatusCode::BAD_REQUEST, "Invalid JSON"),
            AppError::BookmarkNotFound => (StatusCode::NOT_FOUND, "Not found"),
            AppError::InvalidUrl => (StatusCode::BAD_REQUEST, "Invalid URL"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
            AppError::StoreUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Bookmark store is unavailable")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
