use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use registry_core::DomainError;

/// Error returned by handlers. Each endpoint picks the status its failures
/// map to; the body is always `{"message": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    internal: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            internal: false,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// Wraps a domain error with the endpoint's failure status.
    pub fn domain(status: StatusCode, err: DomainError) -> Self {
        Self {
            status,
            internal: matches!(err, DomainError::Store(_)),
            message: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.internal {
            tracing::error!("Request failed ({}): {}", self.status, self.message);
        } else {
            tracing::warn!("Request rejected ({}): {}", self.status, self.message);
        }

        let body = Json(ErrorResponse {
            message: self.message,
        });

        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_keeps_endpoint_status() {
        let err = ApiError::domain(StatusCode::UNPROCESSABLE_ENTITY, DomainError::teacher_not_found());
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message, "teacher object not found");
        assert!(!err.internal);
    }

    #[test]
    fn test_store_errors_are_flagged_internal() {
        let err = ApiError::domain(StatusCode::BAD_REQUEST, DomainError::Store("boom".into()));
        assert!(err.internal);
    }
}
