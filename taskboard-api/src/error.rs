/// Error handling for the API server
///
/// Every handler returns `ApiResult<T>`. Failures collapse to two response
/// shapes, both `{"error": "<message>"}`:
///
/// - `400 Bad Request` for the one input check done before the store is
///   touched (task creation without title/userId)
/// - `500 Internal Server Error` with a fixed, operation-specific message for
///   everything else
///
/// The typed cause of a 500 ([`OperationFailure`]) is kept on the error and
/// logged, but never sent to the client.
///
/// # Example
///
/// ```
/// use taskboard_api::error::{ApiError, ApiResult};
/// use taskboard_shared::error::StoreError;
///
/// fn lookup() -> ApiResult<()> {
///     Err(ApiError::operation("Failed to update task", StoreError::task_not_found(1)))
/// }
///
/// assert_eq!(lookup().unwrap_err().status().as_u16(), 500);
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskboard_shared::error::StoreError;
use thiserror::Error;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Underlying cause of an operation failure
#[derive(Debug, Error)]
pub enum OperationFailure {
    /// The store rejected or failed the operation
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request body, path or query could not be decoded
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Operation failed (500); `message` is what the client sees
    Operation {
        message: &'static str,
        source: OperationFailure,
    },
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Success response body for operations that return no resource
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub message: String,
}

impl ApiError {
    /// Wraps a failure cause under a client-facing message
    pub fn operation(message: &'static str, source: impl Into<OperationFailure>) -> Self {
        ApiError::Operation {
            message,
            source: source.into(),
        }
    }

    /// Request decoding failure reported as the operation's 500
    pub fn invalid_request(message: &'static str, detail: impl fmt::Display) -> Self {
        Self::operation(message, OperationFailure::InvalidRequest(detail.to_string()))
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Operation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The typed store error behind a 500, if any
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            ApiError::Operation {
                source: OperationFailure::Store(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Operation { message, source } => write!(f, "{}: {}", message, source),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::BadRequest(_) => None,
            ApiError::Operation { source, .. } => Some(source),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Operation { message, source } => {
                // Causes stay in the logs; clients only get the fixed message
                match &source {
                    OperationFailure::Store(StoreError::NotFound { .. })
                    | OperationFailure::InvalidRequest(_) => {
                        tracing::warn!(cause = %source, "{}", message)
                    }
                    OperationFailure::Store(_) => tracing::error!(cause = %source, "{}", message),
                }
                message.to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Title and userId are required".to_string());
        assert_eq!(err.to_string(), "Bad request: Title and userId are required");

        let err = ApiError::operation("Failed to delete task", StoreError::task_not_found(3));
        assert_eq!(err.to_string(), "Failed to delete task: task 3 not found");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::invalid_request("Failed to create user", "expected value").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_is_kept() {
        let err = ApiError::operation(
            "Failed to create user",
            StoreError::UniqueViolation("users_email_key".to_string()),
        );
        assert!(matches!(err.store_error(), Some(StoreError::UniqueViolation(_))));

        let err = ApiError::invalid_request("Failed to create user", "missing field `email`");
        assert!(err.store_error().is_none());
    }

    #[tokio::test]
    async fn test_response_body_hides_cause() {
        let err = ApiError::operation(
            "Failed to delete user",
            StoreError::ForeignKeyViolation("tasks_user_id_fkey".to_string()),
        );

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Failed to delete user" }));
    }
}
