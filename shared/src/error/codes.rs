//! Unified error codes for the chapter client
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Event errors
//! - 4xxx: Attendance and excuse errors
//! - 5xxx: Voting errors
//! - 6xxx: Member errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they travel unchanged
/// between the server envelope and the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Officer privilege required
    PrivilegeRequired = 2002,

    // ==================== 3xxx: Event ====================
    /// Event not found
    EventNotFound = 3001,
    /// Join code did not match any open event
    InvalidJoinCode = 3002,
    /// Event has not started or has already closed
    EventClosed = 3003,
    /// Event point specification could not be parsed
    InvalidPointSpec = 3004,

    // ==================== 4xxx: Attendance / Excuse ====================
    /// Member already checked in
    AlreadyCheckedIn = 4001,
    /// Excuse not found
    ExcuseNotFound = 4002,
    /// Event does not accept excuses
    EventNotExcusable = 4003,
    /// Excuse already reviewed
    ExcuseAlreadyReviewed = 4004,

    // ==================== 5xxx: Voting ====================
    /// Voting session not found
    SessionNotFound = 5001,
    /// No voting session is active
    NoActiveSession = 5002,
    /// Candidate not found
    CandidateNotFound = 5003,
    /// Member already voted for this candidate
    AlreadyVoted = 5004,
    /// A rejection must carry a reason
    ReasonRequired = 5005,

    // ==================== 6xxx: Member ====================
    /// Member not found
    MemberNotFound = 6001,
    /// Member email already registered
    MemberEmailExists = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Local storage failure
    StorageError = 9401,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::PrivilegeRequired => "Officer privilege is required",

            // Event
            ErrorCode::EventNotFound => "Event not found",
            ErrorCode::InvalidJoinCode => "Invalid join code",
            ErrorCode::EventClosed => "Event is not open for check-in",
            ErrorCode::InvalidPointSpec => "Invalid point specification",

            // Attendance / Excuse
            ErrorCode::AlreadyCheckedIn => "Already checked in to this event",
            ErrorCode::ExcuseNotFound => "Excuse not found",
            ErrorCode::EventNotExcusable => "Event does not accept excuses",
            ErrorCode::ExcuseAlreadyReviewed => "Excuse has already been reviewed",

            // Voting
            ErrorCode::SessionNotFound => "Voting session not found",
            ErrorCode::NoActiveSession => "No voting session is active",
            ErrorCode::CandidateNotFound => "Candidate not found",
            ErrorCode::AlreadyVoted => "Vote already submitted for this candidate",
            ErrorCode::ReasonRequired => "A reason is required when rejecting",

            // Member
            ErrorCode::MemberNotFound => "Member not found",
            ErrorCode::MemberEmailExists => "Member email already registered",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Problem connecting to server",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageError => "Local storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::PrivilegeRequired),

            // Event
            3001 => Ok(ErrorCode::EventNotFound),
            3002 => Ok(ErrorCode::InvalidJoinCode),
            3003 => Ok(ErrorCode::EventClosed),
            3004 => Ok(ErrorCode::InvalidPointSpec),

            // Attendance / Excuse
            4001 => Ok(ErrorCode::AlreadyCheckedIn),
            4002 => Ok(ErrorCode::ExcuseNotFound),
            4003 => Ok(ErrorCode::EventNotExcusable),
            4004 => Ok(ErrorCode::ExcuseAlreadyReviewed),

            // Voting
            5001 => Ok(ErrorCode::SessionNotFound),
            5002 => Ok(ErrorCode::NoActiveSession),
            5003 => Ok(ErrorCode::CandidateNotFound),
            5004 => Ok(ErrorCode::AlreadyVoted),
            5005 => Ok(ErrorCode::ReasonRequired),

            // Member
            6001 => Ok(ErrorCode::MemberNotFound),
            6002 => Ok(ErrorCode::MemberEmailExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9401 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
