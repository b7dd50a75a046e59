//! Chapter Client - sync and aggregation core for the chapter app
//!
//! Fetches chapter data through an injected [`Fetcher`], merges each payload
//! into a normalized [`ChapterStore`], and derives standings and vote tallies
//! from it.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetch;
pub mod freshness;
pub mod merge;
pub mod storage;
pub mod store;
pub mod sync;

pub use config::SyncConfig;
pub use error::{ClientError, ClientResult};
pub use fetch::{FetchRequest, Fetcher};
pub use freshness::{Clock, LoadHistory, ResourceKey, ResourceKind, SystemClock, should_load};
pub use storage::{KeyValueStore, MemoryStore};
pub use store::{ChapterStore, StoreUpdate};
pub use sync::{ChapterSync, LoadOutcome};

// Re-export shared types for convenience
pub use shared::FetchResponse;
pub use shared::models;
