//! Error-to-status mapping for every handler.
//!
//! Body: `{"error": "<message>", "code": "<CODE>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shiftdesk_scheduler::{AssignmentError, SchedulerError};
use shiftdesk_store::StoreError;
use tracing::error;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    code: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// `404` with "`<what>` not found".
    pub fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", format!("{what} not found"))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, error = %self.message, "request failed");
        }
        let body = ErrorBody {
            error: &self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(_) => {
                Self::new(StatusCode::CONFLICT, "ALREADY_EXISTS", err.to_string())
            }
            StoreError::ForeignKeyViolation(_) => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNKNOWN_REFERENCE",
                err.to_string(),
            ),
            StoreError::Database(_) | StoreError::InvalidData(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                err.to_string(),
            ),
        }
    }
}

impl From<AssignmentError> for ApiError {
    fn from(err: AssignmentError) -> Self {
        let code = err.code();
        match err {
            AssignmentError::AssignmentNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, code, err.to_string())
            }
            AssignmentError::Store(inner) => inner.into(),
            _ => Self::new(StatusCode::BAD_REQUEST, code, err.to_string()),
        }
    }
}

impl From<SchedulerError> for ApiError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::NotFound { kind, .. } => Self::not_found(kind),
            SchedulerError::InvalidWindow(_) => Self::bad_request(err.to_string()),
            SchedulerError::Store(inner) => inner.into(),
        }
    }
}
