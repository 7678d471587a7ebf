use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    /// Any failure of an operation or its collaborators, reported flatly.
    #[error("{operation} error: {message}")]
    OperationFailed {
        operation: &'static str,
        message: String,
    },
}

impl ApiError {
    pub fn failed(operation: &'static str, error: impl Display) -> Self {
        Self::OperationFailed {
            operation,
            message: error.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::OperationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(%status, error = %self, "request failed");

        (
            status,
            Json(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_failure_names_operation_and_cause() {
        let err = ApiError::failed("Upload", "disk full");
        assert_eq!(err.to_string(), "Upload error: disk full");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bad_request_maps_to_400() {
        let err = ApiError::BadRequest("missing file field".to_string());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn client_errors_keep_their_status() {
        let missing = ApiError::NotFound("no document named lease.pdf".to_string());
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let oversized = ApiError::PayloadTooLarge("recording would exceed 10 bytes".to_string());
        assert_eq!(oversized.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
