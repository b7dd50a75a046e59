//! Freshness tracking
//!
//! Decides whether a cached slice of data is old enough to fetch again.
//! Each fetchable slice has a [`ResourceKey`] composed from a resource name and,
//! where the slice is scoped, the scoping value, so independent slices age
//! independently. [`should_load`] is a pure predicate; callers record a fresh
//! timestamp into [`LoadHistory`] after a successful fetch.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared::models::member_key;
use std::collections::HashMap;
use std::fmt;

/// Kind of resource a key refers to, used for TTL lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Events,
    Directory,
    Member,
    Points,
    EventRecords,
    Excuses,
    Voting,
    Votes,
}

/// Identifier of a fetchable slice of data and its scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn events() -> Self {
        Self("events".to_string())
    }

    pub fn directory() -> Self {
        Self("directory".to_string())
    }

    /// Single member profile
    pub fn member(email: &str) -> Self {
        Self(format!("user-{}", member_key(email)))
    }

    /// A member's attendance and excuses, which back the points view
    pub fn points(email: &str) -> Self {
        Self(format!("points-{}", member_key(email)))
    }

    /// Attendance and excuses recorded against one event
    pub fn event_records(event_id: &str) -> Self {
        Self(format!("event-{event_id}"))
    }

    pub fn excuses() -> Self {
        Self("excuses".to_string())
    }

    pub fn voting() -> Self {
        Self("voting".to_string())
    }

    pub fn votes(session_id: &str, candidate_id: &str) -> Self {
        Self(format!("votes-{session_id}-{candidate_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Kind derived from the key's resource name
    pub fn kind(&self) -> Option<ResourceKind> {
        let key = self.0.as_str();
        match key {
            "events" => Some(ResourceKind::Events),
            "directory" => Some(ResourceKind::Directory),
            "excuses" => Some(ResourceKind::Excuses),
            "voting" => Some(ResourceKind::Voting),
            _ if key.starts_with("user-") => Some(ResourceKind::Member),
            _ if key.starts_with("points-") => Some(ResourceKind::Points),
            _ if key.starts_with("event-") => Some(ResourceKind::EventRecords),
            _ if key.starts_with("votes-") => Some(ResourceKind::Votes),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// True when `key` was never loaded or its last load is at least `ttl` old
pub fn should_load(
    history: &HashMap<ResourceKey, DateTime<Utc>>,
    key: &ResourceKey,
    ttl: Duration,
    now: DateTime<Utc>,
) -> bool {
    match history.get(key) {
        None => true,
        Some(loaded_at) => *loaded_at <= now - ttl,
    }
}

/// Resource key → last successful load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadHistory {
    entries: HashMap<ResourceKey, DateTime<Utc>>,
}

impl LoadHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful load of `key` at `at`
    pub fn record(&mut self, key: ResourceKey, at: DateTime<Utc>) {
        self.entries.insert(key, at);
    }

    pub fn last_loaded(&self, key: &ResourceKey) -> Option<DateTime<Utc>> {
        self.entries.get(key).copied()
    }

    pub fn is_stale(&self, key: &ResourceKey, ttl: Duration, now: DateTime<Utc>) -> bool {
        should_load(&self.entries, key, ttl, now)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &HashMap<ResourceKey, DateTime<Utc>> {
        &self.entries
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, 12, minute, 0).unwrap()
    }

    #[test]
    fn test_absent_key_should_load() {
        let history = HashMap::new();
        assert!(should_load(&history, &ResourceKey::events(), Duration::minutes(5), at(0)));
    }

    #[test]
    fn test_fresh_key_should_not_load() {
        let mut history = HashMap::new();
        history.insert(ResourceKey::events(), at(0));
        assert!(!should_load(&history, &ResourceKey::events(), Duration::minutes(5), at(4)));
    }

    #[test]
    fn test_expired_key_should_load() {
        let mut history = HashMap::new();
        history.insert(ResourceKey::events(), at(0));
        assert!(should_load(&history, &ResourceKey::events(), Duration::minutes(5), at(5)));
        assert!(should_load(&history, &ResourceKey::events(), Duration::minutes(5), at(30)));
    }

    #[test]
    fn test_scoped_keys_age_independently() {
        let mut history = LoadHistory::new();
        history.record(ResourceKey::points("alice@example.com"), at(0));

        let ttl = Duration::minutes(5);
        assert!(!history.is_stale(&ResourceKey::points("alice@example.com"), ttl, at(1)));
        assert!(history.is_stale(&ResourceKey::points("bob@example.com"), ttl, at(1)));
        assert!(history.is_stale(&ResourceKey::member("alice@example.com"), ttl, at(1)));
    }

    #[test]
    fn test_key_composition_and_kind() {
        assert_eq!(ResourceKey::member("Alice@Example.com").as_str(), "user-alice@example.com");
        assert_eq!(ResourceKey::points("alice@example.com").as_str(), "points-alice@example.com");
        assert_eq!(ResourceKey::votes("s1", "c1").as_str(), "votes-s1-c1");

        assert_eq!(ResourceKey::events().kind(), Some(ResourceKind::Events));
        assert_eq!(ResourceKey::event_records("5").kind(), Some(ResourceKind::EventRecords));
        assert_eq!(ResourceKey::member("a@b.c").kind(), Some(ResourceKind::Member));
        assert_eq!(ResourceKey::votes("s", "c").kind(), Some(ResourceKind::Votes));
        assert_eq!(ResourceKey::voting().kind(), Some(ResourceKind::Voting));
        assert_eq!(ResourceKey::from("mystery").kind(), None);
    }

    #[test]
    fn test_history_json_roundtrip_keeps_timestamps() {
        let mut history = LoadHistory::new();
        history.record(ResourceKey::events(), at(3));
        history.record(ResourceKey::excuses(), at(7));

        let json = history.to_json().unwrap();
        assert!(json.contains("\"events\""));
        let restored = LoadHistory::from_json(&json).unwrap();
        assert_eq!(restored, history);
        assert_eq!(restored.last_loaded(&ResourceKey::excuses()), Some(at(7)));
    }
}
