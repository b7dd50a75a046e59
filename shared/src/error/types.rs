//! Error types and the fetch response envelope

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }
}

/// Error body attached to a failed fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message from the server
    pub message: String,
    /// Field → message map when the server blames specific form fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blame: Option<HashMap<String, String>>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            blame: None,
        }
    }

    pub fn with_blame(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.blame
            .get_or_insert_with(HashMap::new)
            .insert(field.into(), message.into());
        self
    }
}

/// Envelope returned by every fetch
///
/// - `success`: whether the server accepted the request
/// - `code`: HTTP status, `0` when nothing came back
/// - `data`: payload (present on success)
/// - `error`: failure body (present on failure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse<T> {
    pub success: bool,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T> FetchResponse<T> {
    /// Create a success response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            code: 200,
            data: Some(data),
            error: None,
        }
    }

    /// Create a failed response
    pub fn failure(code: u16, error: ErrorBody) -> Self {
        Self {
            success: false,
            code,
            data: None,
            error: Some(error),
        }
    }

    /// Create the response for a request that never reached the server
    pub fn unreachable() -> Self {
        Self::failure(0, ErrorBody::new(ErrorCode::NetworkError.message()))
    }
}

impl<T> From<AppError> for FetchResponse<T> {
    fn from(err: AppError) -> Self {
        let blame = err.details.map(|details| {
            details
                .into_iter()
                .map(|(k, v)| match v {
                    Value::String(s) => (k, s),
                    other => (k, other.to_string()),
                })
                .collect()
        });

        Self::failure(
            err.code.http_status().as_u16(),
            ErrorBody {
                message: err.message,
                blame,
            },
        )
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::EventNotFound);
        assert_eq!(err.code, ErrorCode::EventNotFound);
        assert_eq!(err.message, "Event not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("reason", "required")
            .with_detail("event_id", "5");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("reason").unwrap(), "required");
        assert_eq!(details.get("event_id").unwrap(), "5");
    }

    #[test]
    fn test_app_error_convenience_constructors() {
        assert_eq!(AppError::not_authenticated().code, ErrorCode::NotAuthenticated);
        assert_eq!(AppError::not_authenticated().message, "User is not authenticated");
        assert_eq!(
            AppError::not_authenticated().http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_fetch_response_from_app_error() {
        let err = AppError::validation("Fix the form").with_detail("reason", "required");
        let response: FetchResponse<()> = err.into();

        assert!(!response.success);
        assert_eq!(response.code, 400);
        let body = response.error.unwrap();
        assert_eq!(body.message, "Fix the form");
        assert_eq!(body.blame.unwrap().get("reason").unwrap(), "required");
    }

    #[test]
    fn test_fetch_response_deserialize() {
        let json = r#"{"success":true,"code":200,"data":[1,2,3]}"#;
        let response: FetchResponse<Vec<i32>> = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.data, Some(vec![1, 2, 3]));
        assert!(response.error.is_none());

        let json = r#"{"success":false,"code":401,"error":{"message":"expired"}}"#;
        let response: FetchResponse<Vec<i32>> = serde_json::from_str(json).unwrap();
        assert!(!response.success);
        assert_eq!(response.error.unwrap(), ErrorBody::new("expired"));
    }

    #[test]
    fn test_unreachable_response() {
        let response = FetchResponse::<()>::unreachable();
        assert_eq!(response.code, 0);
        assert!(!response.success);
    }
}
