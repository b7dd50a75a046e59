//! Attendance and excuse merging

use serde::{Deserialize, Serialize};
use shared::models::{AttendanceRecord, ExcuseRecord, RecordsBatch};
use std::collections::HashMap;

/// Normalized attendance and excuses: member email → event id → record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Records {
    pub attended: HashMap<String, HashMap<String, AttendanceRecord>>,
    pub excused: HashMap<String, HashMap<String, ExcuseRecord>>,
}

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attendance of one member, keyed by event id
    pub fn attended_by(&self, email: &str) -> Option<&HashMap<String, AttendanceRecord>> {
        self.attended.get(&shared::models::member_key(email))
    }

    /// Excuses of one member, keyed by event id
    pub fn excused_by(&self, email: &str) -> Option<&HashMap<String, ExcuseRecord>> {
        self.excused.get(&shared::models::member_key(email))
    }

    pub fn has_attended(&self, email: &str, event_id: &str) -> bool {
        self.attended_by(email)
            .is_some_and(|events| events.contains_key(event_id))
    }

    /// Total number of (member, event) entries across both categories
    pub fn len(&self) -> usize {
        self.attended.values().map(HashMap::len).sum::<usize>()
            + self.excused.values().map(HashMap::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fold a fetched batch into the records
///
/// Each record lands in its own member's sub-map at its event id. Writes are
/// keyed replacements, so re-merging a batch changes nothing and no existing
/// key is ever dropped.
pub fn merge_records(mut current: Records, incoming: RecordsBatch) -> Records {
    let attended = incoming.attended.len();
    let excused = incoming.excused.len();

    for record in incoming.attended {
        current
            .attended
            .entry(record.member_key())
            .or_default()
            .insert(record.event_id.clone(), record);
    }

    for record in incoming.excused {
        current
            .excused
            .entry(record.member_key())
            .or_default()
            .insert(record.event_id.clone(), record);
    }

    tracing::debug!(attended, excused, total = current.len(), "Merged records");
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Approval;

    fn attended(email: &str, event_id: &str) -> AttendanceRecord {
        AttendanceRecord::new(email, event_id)
    }

    fn excuse(email: &str, event_id: &str, approval: Approval) -> ExcuseRecord {
        ExcuseRecord {
            email: email.to_string(),
            event_id: event_id.to_string(),
            reason: "midterm".to_string(),
            approval,
            late: false,
        }
    }

    fn batch(attended: Vec<AttendanceRecord>, excused: Vec<ExcuseRecord>) -> RecordsBatch {
        RecordsBatch { attended, excused }
    }

    fn seeded() -> Records {
        merge_records(
            Records::new(),
            batch(
                vec![attended("carol@example.com", "1"), attended("carol@example.com", "2")],
                vec![excuse("dave@example.com", "2", Approval::Pending)],
            ),
        )
    }

    #[test]
    fn test_member_scoped_fetch_into_empty_records() {
        let records = merge_records(
            Records::new(),
            batch(vec![attended("alice@example.com", "5")], vec![]),
        );

        assert!(records.attended["alice@example.com"].contains_key("5"));
        assert!(records.excused.is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let b = batch(
            vec![attended("alice@example.com", "5"), attended("bob@example.com", "5")],
            vec![excuse("alice@example.com", "6", Approval::Approved)],
        );

        let once = merge_records(seeded(), b.clone());
        let twice = merge_records(once.clone(), b);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_disjoint_batches_commute() {
        let b1 = batch(
            vec![attended("alice@example.com", "5")],
            vec![excuse("alice@example.com", "6", Approval::Pending)],
        );
        let b2 = batch(
            vec![attended("bob@example.com", "5"), attended("alice@example.com", "7")],
            vec![excuse("bob@example.com", "6", Approval::Rejected)],
        );

        let left = merge_records(merge_records(seeded(), b1.clone()), b2.clone());
        let right = merge_records(merge_records(seeded(), b2), b1);
        assert_eq!(left, right);
    }

    #[test]
    fn test_merge_never_drops_existing_keys() {
        let before = seeded();
        let after = merge_records(
            before.clone(),
            batch(vec![attended("erin@example.com", "9")], vec![]),
        );

        for (email, events) in &before.attended {
            for event_id in events.keys() {
                assert!(after.attended[email].contains_key(event_id));
            }
        }
        for (email, events) in &before.excused {
            for event_id in events.keys() {
                assert!(after.excused[email].contains_key(event_id));
            }
        }
    }

    #[test]
    fn test_member_scoped_merge_leaves_other_members_alone() {
        let before = seeded();
        let after = merge_records(
            before.clone(),
            batch(
                vec![attended("carol@example.com", "3")],
                vec![excuse("carol@example.com", "4", Approval::Pending)],
            ),
        );

        assert_eq!(after.excused["dave@example.com"], before.excused["dave@example.com"]);
        assert_eq!(after.attended["carol@example.com"].len(), 3);
    }

    #[test]
    fn test_excuse_approval_last_write_wins() {
        let after = merge_records(
            seeded(),
            batch(vec![], vec![excuse("dave@example.com", "2", Approval::Approved)]),
        );

        assert_eq!(after.excused["dave@example.com"]["2"].approval, Approval::Approved);
        assert_eq!(after.excused["dave@example.com"].len(), 1);
    }

    #[test]
    fn test_records_keyed_by_normalized_email() {
        let records = merge_records(
            Records::new(),
            batch(vec![attended("Alice@Example.com ", "5")], vec![]),
        );
        assert!(records.has_attended("alice@example.com", "5"));
        assert!(records.has_attended("ALICE@example.com", "5"));
        assert!(!records.has_attended("alice@example.com", "6"));
        assert_eq!(records.len(), 1);
    }
}
