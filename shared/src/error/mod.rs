//! Unified error system for the chapter client
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`FetchResponse`]: The envelope every fetch resolves to
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Event errors
//! - 4xxx: Attendance and excuse errors
//! - 5xxx: Voting errors
//! - 6xxx: Member errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, FetchResponse};
//!
//! let err = AppError::with_message(ErrorCode::ReasonRequired, "Say why")
//!     .with_detail("reason", "required");
//!
//! let response: FetchResponse<()> = err.into();
//! assert_eq!(response.code, 400);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody, FetchResponse};
