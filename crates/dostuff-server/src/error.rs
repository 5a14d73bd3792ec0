//! HTTP error types for the Do Stuff server.
//!
//! Maps domain errors from `dostuff-core` into appropriate HTTP responses.
//! Every error variant produces a JSON body with a machine-readable `error`
//! field and a human-readable `message`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use dostuff_core::error::{AuditError, NavigationError, NotifyError};

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Requested view or navigation id does not exist.
    NotFound(String),
    /// Client sent invalid input.
    BadRequest(String),
    /// A third-party service the request depends on failed.
    BadGateway(String),
    /// Internal server error.
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "bad_gateway", msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<NavigationError> for AppError {
    fn from(err: NavigationError) -> Self {
        match err {
            NavigationError::UnknownRoute { .. } | NavigationError::UnknownView { .. } => {
                Self::NotFound(err.to_string())
            }
        }
    }
}

impl From<AuditError> for AppError {
    fn from(err: AuditError) -> Self {
        match err {
            AuditError::UnknownSeverity { .. } => Self::BadRequest(err.to_string()),
            AuditError::Selector { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::InvalidEmail { .. } => Self::BadRequest(err.to_string()),
            NotifyError::Rejected { .. } | NotifyError::Transport { .. } => {
                Self::BadGateway(err.to_string())
            }
        }
    }
}
