//! Application error type.
//!
//! The taxonomy is flat: every failure reaches the caller as
//! `{success: false, error: <message>}`. Driver-derived variants carry the
//! driver's message text unmodified so it can be shown verbatim.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::ApiResponse;

/// Errors surfaced by the proxy service and the browser client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Network reachability, TLS, or authentication failure while connecting.
    #[error("{0}")]
    DatabaseConnection(String),

    /// Failure while running a statement (syntax, permission, constraint...).
    #[error("{0}")]
    DatabaseQuery(String),

    /// Malformed request input.
    #[error("{0}")]
    Validation(String),

    /// Connection string that could not be parsed.
    #[error("{0}")]
    InvalidConnectionString(String),

    /// Failure reported by, or while talking to, the proxy service.
    ///
    /// Carries the service's own message when it sent one.
    #[error("{0}")]
    ExternalService(String),

    #[error("{0}")]
    Internal(String),
}

/// Result alias used across the workspace.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status reported for this error.
    ///
    /// Everything caused by the caller's input or the target database is a
    /// client error; only internal faults map to 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Json(ApiResponse::<()>::failure(self.to_string()))).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
