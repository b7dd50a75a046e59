//! Sync configuration

use crate::error::{ClientError, ClientResult};
use crate::freshness::ResourceKind;
use chrono::Duration;
use serde::Deserialize;
use std::collections::HashMap;

/// Storage key the load history is persisted under by default
pub const DEFAULT_HISTORY_KEY: &str = "load-history";

/// Freshness configuration for the sync coordinator
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// TTL used for any resource kind without an override
    pub default_ttl: Duration,

    /// Per-kind TTL overrides
    pub ttls: HashMap<ResourceKind, Duration>,

    /// Key-value storage key for the persisted load history
    pub history_key: String,
}

impl SyncConfig {
    /// Create a configuration with a single TTL for everything
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            ttls: HashMap::new(),
            history_key: DEFAULT_HISTORY_KEY.to_string(),
        }
    }

    /// Set the default TTL
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Override the TTL of one resource kind
    pub fn with_ttl(mut self, kind: ResourceKind, ttl: Duration) -> Self {
        self.ttls.insert(kind, ttl);
        self
    }

    /// Set the storage key for the load history
    pub fn with_history_key(mut self, key: impl Into<String>) -> Self {
        self.history_key = key.into();
        self
    }

    /// TTL that applies to a resource kind
    pub fn ttl_for(&self, kind: ResourceKind) -> Duration {
        self.ttls.get(&kind).copied().unwrap_or(self.default_ttl)
    }

    /// Parse a JSON configuration, TTLs given in seconds
    ///
    /// ```
    /// use chapter_client::{ResourceKind, SyncConfig};
    ///
    /// let config = SyncConfig::from_json(r#"{"default_ttl_secs": 120, "ttl_secs": {"voting": 5}}"#).unwrap();
    /// assert_eq!(config.ttl_for(ResourceKind::Voting).num_seconds(), 5);
    /// assert_eq!(config.ttl_for(ResourceKind::Events).num_seconds(), 120);
    /// ```
    pub fn from_json(json: &str) -> ClientResult<Self> {
        let raw: RawSyncConfig = serde_json::from_str(json)?;
        raw.try_into()
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(Duration::minutes(5))
            .with_ttl(ResourceKind::Directory, Duration::hours(1))
            .with_ttl(ResourceKind::Voting, Duration::seconds(15))
            .with_ttl(ResourceKind::Votes, Duration::seconds(15))
    }
}

#[derive(Debug, Deserialize)]
struct RawSyncConfig {
    default_ttl_secs: i64,
    #[serde(default)]
    ttl_secs: HashMap<ResourceKind, i64>,
    #[serde(default)]
    history_key: Option<String>,
}

impl TryFrom<RawSyncConfig> for SyncConfig {
    type Error = ClientError;

    fn try_from(raw: RawSyncConfig) -> Result<Self, Self::Error> {
        let seconds = |value: i64| {
            if value < 0 {
                Err(ClientError::Serialization(format!(
                    "TTL must be non-negative, got {value}"
                )))
            } else {
                Ok(Duration::seconds(value))
            }
        };

        let mut config = SyncConfig::new(seconds(raw.default_ttl_secs)?);
        for (kind, secs) in raw.ttl_secs {
            config.ttls.insert(kind, seconds(secs)?);
        }
        if let Some(key) = raw.history_key {
            config.history_key = key;
        }
        Ok(config)
    }
}
