//! API response wrapper types.
//!
//! Every endpoint answers with an application-level `success` flag that is
//! independent of the HTTP status. Success payloads are flattened into the
//! envelope so the wire shapes stay flat:
//!
//! ```json
//! {"success": true}
//! {"success": true, "tables": [{"table_schema": "public", "table_name": "orders"}]}
//! {"success": true, "columns": ["x"], "rows": [{"x": 1}]}
//! {"success": false, "error": "password authentication failed for user \"u\""}
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppError;

/// Standard API response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,

    /// Operation payload, inlined next to `success`.
    #[serde(flatten)]
    pub data: Option<T>,

    /// Failure message (present on failure).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response with a payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Creates a failure response carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Converts the envelope back into a result.
    ///
    /// The envelope does not say which operation failed, so failures come
    /// back as [`AppError::ExternalService`] with the service's message. A
    /// failure without a message falls back to `fallback`, the way the
    /// browser shows "Query failed" when the service sends nothing better.
    pub fn into_result(self, fallback: &str) -> Result<Option<T>, AppError> {
        if self.success {
            Ok(self.data)
        } else {
            let message = self
                .error
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_string());
            Err(AppError::ExternalService(message))
        }
    }
}

impl ApiResponse<()> {
    /// Creates a successful response without payload.
    pub fn success() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

/// Failure body, documented for the OpenAPI schema.
#[derive(Debug, Serialize, ToSchema)]
pub struct FailureBody {
    /// Always `false`.
    pub success: bool,
    /// Driver or validation message, passed through unmodified.
    pub error: String,
}

/// Bare success body, documented for the OpenAPI schema.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessBody {
    /// Always `true`.
    pub success: bool,
}
