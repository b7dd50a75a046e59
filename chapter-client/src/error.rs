//! Client error types

use shared::error::{ErrorBody, ErrorCategory, ErrorCode};
use std::collections::HashMap;
use thiserror::Error;

/// Client error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Nothing came back from the server
    #[error("Problem connecting to server")]
    Transport,

    /// Credentials are stale or invalid
    #[error("Authentication required")]
    Unauthorized,

    /// Server blamed specific fields
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        blame: HashMap<String, String>,
    },

    /// Server rejected the request for another reason
    #[error("Server error ({code}): {message}")]
    Server { code: u16, message: String },

    /// Anything raised while processing a response
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// Key-value storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ClientError {
    /// Classify a failed fetch envelope
    pub fn from_response(code: u16, error: Option<ErrorBody>) -> Self {
        let body = error.unwrap_or_else(|| ErrorBody::new(ErrorCode::from_status(code).message()));

        match ErrorCode::from_status(code) {
            ErrorCode::NetworkError => Self::Transport,
            ErrorCode::NotAuthenticated => Self::Unauthorized,
            _ => match body.blame {
                Some(blame) if !blame.is_empty() => Self::Validation {
                    message: body.message,
                    blame,
                },
                _ => Self::Server {
                    code,
                    message: body.message,
                },
            },
        }
    }

    /// Whether this failure invalidates the whole session, not just one resource
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Closest shared error code, for logging and display
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Transport => ErrorCode::NetworkError,
            Self::Unauthorized => ErrorCode::NotAuthenticated,
            Self::Validation { .. } => ErrorCode::ValidationFailed,
            Self::Server { code, .. } => ErrorCode::from_status(*code),
            Self::Unexpected(_) => ErrorCode::Unknown,
            Self::Storage(_) => ErrorCode::StorageError,
            Self::Serialization(_) => ErrorCode::InvalidFormat,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.code().category()
    }

    /// Field → message map for form display
    pub fn blame(&self) -> Option<&HashMap<String, String>> {
        match self {
            Self::Validation { blame, .. } => Some(blame),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<shared::AppError> for ClientError {
    fn from(err: shared::AppError) -> Self {
        let blame = err
            .details
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => (k, s),
                other => (k, other.to_string()),
            })
            .collect();

        Self::Validation {
            message: err.message,
            blame,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_transport() {
        assert_eq!(ClientError::from_response(0, None), ClientError::Transport);
        assert_eq!(
            ClientError::Transport.to_string(),
            "Problem connecting to server"
        );
    }

    #[test]
    fn test_classify_unauthorized_is_session_fatal() {
        let err = ClientError::from_response(401, Some(ErrorBody::new("token expired")));
        assert_eq!(err, ClientError::Unauthorized);
        assert!(err.is_session_fatal());
        assert!(!ClientError::Transport.is_session_fatal());
    }

    #[test]
    fn test_classify_validation_with_blame() {
        let body = ErrorBody::new("Fix the form").with_blame("reason", "required");
        let err = ClientError::from_response(400, Some(body));
        assert_eq!(err.blame().unwrap().get("reason").unwrap(), "required");
    }

    #[test]
    fn test_classify_server_without_blame() {
        let err = ClientError::from_response(404, Some(ErrorBody::new("Event not found")));
        assert_eq!(
            err,
            ClientError::Server {
                code: 404,
                message: "Event not found".to_string()
            }
        );
        assert!(err.blame().is_none());

        let err = ClientError::from_response(500, None);
        assert!(matches!(err, ClientError::Server { code: 500, .. }));
    }

    #[test]
    fn test_error_code_and_category() {
        assert_eq!(ClientError::Transport.code(), ErrorCode::NetworkError);
        assert_eq!(ClientError::Transport.category(), ErrorCategory::System);
        assert_eq!(ClientError::Unauthorized.category(), ErrorCategory::Auth);

        let err = ClientError::from_response(403, Some(ErrorBody::new("Officers only")));
        assert_eq!(err.code(), ErrorCode::PermissionDenied);
        assert_eq!(err.category(), ErrorCategory::Permission);

        let err = ClientError::Storage("disk full".to_string());
        assert_eq!(err.category().name(), "system");
    }

    #[test]
    fn test_from_app_error_keeps_details_as_blame() {
        let app = shared::AppError::validation("Say why").with_detail("reason", "required");
        let err: ClientError = app.into();
        assert_eq!(err.blame().unwrap().get("reason").unwrap(), "required");
    }
}
