use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::api::MessageResponse;
use common::form::FieldError;
use common::storage::StorageError;
use sea_orm::DbErr;

use crate::extraction::ExtractionError;
use crate::recognition::RecognitionError;

/// Application-level error type.
///
/// Every variant renders as `{code, message}` so that form clients can show
/// `message` no matter what went wrong.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// Uploaded file is not one of the accepted image types.
    FileNotAllowed,
    NotFound(String),
    /// OCR or schedule extraction failed.
    Upstream(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, MessageResponse) {
        let (status, code, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::FileNotAllowed => (
                StatusCode::BAD_REQUEST,
                "FILE_NOT_ALLOWED",
                "File not allowed".into(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Upstream(detail) => {
                tracing::warn!("Upstream failure: {}", detail);
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "Could not read a schedule from the uploaded image".into(),
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".into(),
                )
            }
        };

        (
            status,
            MessageResponse {
                message,
                code: Some(code.to_string()),
                id: None,
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SizeLimitExceeded { .. } | StorageError::Empty => {
                AppError::Validation(err.to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<RecognitionError> for AppError {
    fn from(err: RecognitionError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::Upstream(err.to_string())
    }
}
