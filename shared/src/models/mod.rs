//! Data models
//!
//! Payload shapes returned by the chapter API. Every domain field is
//! required at deserialization; a payload missing one is rejected at the
//! boundary instead of reaching the merge engines half-filled.

pub mod attendance;
pub mod event;
pub mod member;
pub mod voting;

// Re-exports
pub use attendance::*;
pub use event::*;
pub use member::*;
pub use voting::*;
