use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::assessment::catalog::Category;

/// Errors raised inside the assessment pipeline.
///
/// Only `UnknownCategory`, `MalformedJudgment`, `ProviderUnavailable` and
/// `ProviderTimeout` ever reach a `ScanReport`, as a failed category.
/// `InvalidRecord` is logged and the record dropped.
#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("No catalog fields for category '{0}'")]
    UnknownCategory(Category),

    #[error("Malformed judgment payload: {0}")]
    MalformedJudgment(String),

    #[error("Invalid judgment record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("Judgment provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Judgment provider timed out after {seconds}s for category '{category}'")]
    ProviderTimeout { category: Category, seconds: u64 },
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
