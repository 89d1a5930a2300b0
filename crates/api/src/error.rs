//! Mapping of domain errors onto HTTP responses.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use palco_core::{ErrorKind, RepositoryError};
use palco_core::project::ProjectError;
use palco_core::reconciliation::ReconciliationError;
use palco_core::storage::StorageError;
use palco_shared::AppError;

/// Error returned by every handler.
///
/// Renders as `{"error": <code>, "message": <text>}`. Server-side causes are
/// logged and replaced with a generic message.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self(AppError::Validation(msg.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ReconciliationError> for ApiError {
    fn from(err: ReconciliationError) -> Self {
        let msg = err.to_string();
        let app = match (err.kind(), &err) {
            (_, ReconciliationError::Repository(RepositoryError::Conflict(_))) => {
                AppError::Conflict(msg)
            }
            (_, ReconciliationError::Repository(_)) => AppError::Database(msg),
            (ErrorKind::NotFound, _) => AppError::NotFound(msg),
            (ErrorKind::Validation, _) => AppError::Validation(msg),
            (ErrorKind::TooLarge, _) => AppError::PayloadTooLarge(msg),
            (ErrorKind::UnsupportedType, _) => AppError::UnsupportedMediaType(msg),
            (ErrorKind::Storage, _) => AppError::Storage(msg),
        };
        Self(app)
    }
}

impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        let msg = err.to_string();
        let app = match err {
            ProjectError::NotFound(_) => AppError::NotFound(msg),
            ProjectError::Validation(_) => AppError::Validation(msg),
            ProjectError::Repository(RepositoryError::Conflict(_)) => AppError::Conflict(msg),
            ProjectError::Repository(_) => AppError::Database(msg),
        };
        Self(app)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ReconciliationError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self(AppError::PayloadTooLarge(err.body_text()))
        } else {
            Self::validation(err.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
            "An internal error occurred".to_string()
        } else {
            self.0.to_string()
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}
