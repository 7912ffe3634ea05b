//! # API Error Types
//!
//! Maps core [`ServiceError`]s and request-decoding failures to HTTP status
//! codes and a uniform JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use customer_core::ServiceError;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "INVALID_IDENTITY", "NOT_FOUND").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Error classified by the customer service.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Request body is not a complete, well-typed customer record (422).
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Path parameter could not be parsed (400).
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Service(err) => {
                let status = match err {
                    ServiceError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    ServiceError::InvalidIdentity => StatusCode::BAD_REQUEST,
                    ServiceError::DuplicateIdentity => StatusCode::CONFLICT,
                    ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                    ServiceError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.code())
            }
            Self::InvalidBody(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_INPUT"),
            Self::InvalidPath(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Persistence messages pass through; only task-level faults are hidden.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) | Self::Service(ServiceError::Persistence(_)) => {
                error!(
                    "event=http_error module=api status=error code={} error={}",
                    code, self
                )
            }
            _ => warn!("event=http_error module=api status=rejected code={code}"),
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}
