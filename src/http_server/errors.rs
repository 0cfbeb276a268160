//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::observability::Logger;
use crate::store::StoreError;

/// Errors surfaced by the record routes.
///
/// Persistence failures keep the operation name for the client-facing
/// message; the underlying error is logged server-side only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Parent phase not found")]
    ParentNotFound,

    #[error("Record nesting exceeds what the database backend supports")]
    NestingTooDeep,

    #[error("Failed to {operation}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Classify a store failure for the given operation.
    pub fn from_store(operation: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::ParentNotFound(_) => ApiError::ParentNotFound,
            StoreError::NestingTooDeep => ApiError::NestingTooDeep,
            source => ApiError::Persistence { operation, source },
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ParentNotFound => StatusCode::NOT_FOUND,
            ApiError::NestingTooDeep => StatusCode::BAD_REQUEST,
            ApiError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Persistence { operation, source } = &self {
            Logger::error(
                "REQUEST_FAILED",
                &[("operation", operation), ("detail", &source.to_string())],
            );
        }
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_not_found_maps_to_404_with_expected_body() {
        let err = ApiError::from_store(
            "add phase",
            StoreError::ParentNotFound("9".to_string()),
        );
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Parent phase not found");
    }

    #[test]
    fn test_persistence_failure_keeps_generic_message() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = ApiError::from_store(
            "fetch records",
            StoreError::io(std::path::Path::new("data/records.json"), io),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        // The body never leaks the underlying error.
        assert_eq!(err.to_string(), "Failed to fetch records");
    }

    #[test]
    fn test_nesting_too_deep_is_a_client_error() {
        let err = ApiError::from_store("add phase", StoreError::NestingTooDeep);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
