//! Shared types for the chapter client
//!
//! Domain models and the error system used by the sync core and any
//! consumer rendering its state.

pub mod error;
pub mod models;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorBody, ErrorCode, FetchResponse};
