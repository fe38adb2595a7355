use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ErrorResponse;

/// Message returned for any persistence failure. The cause stays in the logs.
pub const SAVE_FAILED_MESSAGE: &str = "Internal error while saving the report.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String, Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SAVE_FAILED_MESSAGE.to_string(),
                    None,
                )
            }
            AppError::Validation(message, errors) => {
                (StatusCode::BAD_REQUEST, message, Some(errors))
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            AppError::UnsupportedMediaType(message) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, message, None)
            }
            AppError::PayloadTooLarge(message) => (StatusCode::PAYLOAD_TOO_LARGE, message, None),
        };

        (status, Json(ErrorResponse { message, errors })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
