use crate::model::{ErrorDetail, ErrorResponse};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use inkdrop_core::ValidationError;
use inkdrop_service::ServiceError;
use thiserror::Error;
use tracing::warn;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("paste not found")]
    NotFound,
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(err) => AppError::Validation(err),
            ServiceError::NotFound => AppError::NotFound,
            ServiceError::Storage(err) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge;
        }
        AppError::Validation(ValidationError::single("body", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "invalid input",
                    details: Some(err.violations().iter().map(ErrorDetail::from).collect()),
                },
            ),
            AppError::NotFound => (StatusCode::NOT_FOUND, ErrorResponse::new("paste not found")),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorResponse::new("payload too large"),
            ),
            AppError::Internal(detail) => {
                warn!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkdrop_core::StorageError;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (
                ServiceError::Validation(ValidationError::single("content", "required")),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::NotFound, StatusCode::NOT_FOUND),
            (
                ServiceError::Storage(StorageError::Unavailable("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }
}
