//! API Error Types
//!
//! Maps application errors to HTTP status codes.

use crate::types::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relayq_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("rate limit exceeded, please slow down")]
    Throttled,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Throttled => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert AppError to an ApiError
///
/// Client errors keep their message; backend failures are reported with
/// `public_message` so store details do not leak to callers.
pub fn to_api_error(err: AppError, public_message: &str) -> ApiError {
    match err {
        AppError::Domain(e) => ApiError::BadRequest(e.to_string()),
        _ => ApiError::Internal(public_message.to_string()),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relayq_core::domain::DomainError;

    #[test]
    fn test_domain_error_is_bad_request() {
        let err = to_api_error(AppError::Domain(DomainError::EmptyUrl), "failed");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "url not provided");
    }

    #[test]
    fn test_store_error_is_hidden() {
        let err = to_api_error(
            AppError::Queue("redis at 10.0.0.3 refused".into()),
            "failed to save url",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "failed to save url");
    }
}
