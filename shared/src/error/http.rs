//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the HTTP status code the server pairs with this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::EventNotFound
            | Self::ExcuseNotFound
            | Self::SessionNotFound
            | Self::CandidateNotFound
            | Self::MemberNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::AlreadyCheckedIn
            | Self::ExcuseAlreadyReviewed
            | Self::AlreadyVoted
            | Self::MemberEmailExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::SessionExpired => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::PrivilegeRequired => StatusCode::FORBIDDEN,

            // 503 Service Unavailable
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::ConfigError | Self::StorageError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (validation and business rules)
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Map a raw status code from a failed fetch onto the closest error code
    ///
    /// Status `0` means no response reached the client at all.
    pub fn from_status(status: u16) -> Self {
        match status {
            0 => Self::NetworkError,
            400 | 422 => Self::ValidationFailed,
            401 => Self::NotAuthenticated,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            408 | 504 => Self::TimeoutError,
            409 => Self::AlreadyExists,
            _ => Self::InternalError,
        }
    }
}
