//! Event Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category code of general meetings
pub const GENERAL_MEETING: &str = "GM";

/// Point categories an event can award
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PointCategory {
    #[serde(rename = "PR")]
    Professional,
    #[serde(rename = "PH")]
    Philanthropy,
    #[serde(rename = "BR")]
    Brotherhood,
    #[serde(rename = "RU")]
    Rush,
    #[serde(rename = "DI")]
    Diversity,
    #[serde(rename = "CH")]
    Chat,
}

impl PointCategory {
    pub const ALL: [PointCategory; 6] = [
        Self::Professional,
        Self::Philanthropy,
        Self::Brotherhood,
        Self::Rush,
        Self::Diversity,
        Self::Chat,
    ];

    /// Two-letter wire code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Professional => "PR",
            Self::Philanthropy => "PH",
            Self::Brotherhood => "BR",
            Self::Rush => "RU",
            Self::Diversity => "DI",
            Self::Chat => "CH",
        }
    }
}

impl fmt::Display for PointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PointCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown point category: {s}"))
    }
}

/// Event, replaced wholesale by `id` on every re-fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    /// Creator email
    pub creator: String,
    /// Category code ("GM" for general meetings)
    pub category: String,
    /// Join code members type in to check in
    pub code: String,
    pub mandatory: bool,
    pub excusable: bool,
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    /// Duration in minutes
    pub duration: u32,
    pub location: String,
    /// Point specification, `"PR:1,BR:2"`
    pub points: String,
}

impl Event {
    pub fn is_general_meeting(&self) -> bool {
        self.category == GENERAL_MEETING
    }

    /// Parsed point specification
    ///
    /// Entries that do not parse are logged and skipped.
    pub fn point_values(&self) -> Vec<(PointCategory, u32)> {
        parse_point_spec(&self.points)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(value) => Some(value),
                Err(reason) => {
                    tracing::warn!(event_id = %self.id, spec = %self.points, %reason, "Skipping point entry");
                    None
                }
            })
            .collect()
    }
}

/// Parse a `category:count` list into per-entry results
pub fn parse_point_spec(spec: &str) -> Vec<Result<(PointCategory, u32), String>> {
    spec.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (category, count) = entry
                .split_once(':')
                .ok_or_else(|| format!("missing ':' in {entry}"))?;
            let category = category.parse::<PointCategory>()?;
            let count = count
                .trim()
                .parse::<u32>()
                .map_err(|e| format!("bad count in {entry}: {e}"))?;
            Ok((category, count))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point_spec() {
        let parsed = parse_point_spec("PR:1, br:2");
        assert_eq!(
            parsed,
            vec![
                Ok((PointCategory::Professional, 1)),
                Ok((PointCategory::Brotherhood, 2))
            ]
        );
    }

    #[test]
    fn test_parse_point_spec_rejects_malformed_entries() {
        let parsed = parse_point_spec("PR:1,XX:2,RU,DI:many");
        assert_eq!(parsed.len(), 4);
        assert!(parsed[0].is_ok());
        assert!(parsed[1].is_err());
        assert!(parsed[2].is_err());
        assert!(parsed[3].is_err());
    }

    #[test]
    fn test_parse_point_spec_empty() {
        assert!(parse_point_spec("").is_empty());
        assert!(parse_point_spec(" , ").is_empty());
    }

    #[test]
    fn test_point_category_serde_codes() {
        let json = serde_json::to_string(&PointCategory::Philanthropy).unwrap();
        assert_eq!(json, "\"PH\"");
        let category: PointCategory = serde_json::from_str("\"CH\"").unwrap();
        assert_eq!(category, PointCategory::Chat);
        assert_eq!(category.to_string(), "CH");
    }
}
