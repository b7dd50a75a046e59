//! Per-category attendance counts

use shared::models::{AttendanceRecord, Event, ExcuseRecord};
use std::collections::HashMap;

/// How a member stands on the events of one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCounts {
    pub attended: u32,
    /// Excused with an approved excuse
    pub excused: u32,
    /// Neither attended nor excused with approval
    pub pending: u32,
    /// `attended + excused`
    pub sum: u32,
}

impl TypeCounts {
    /// Events of the category considered
    pub fn total(&self) -> u32 {
        self.attended + self.excused + self.pending
    }

    /// Share of events covered by attendance or approved excuse; 1.0 with no events
    pub fn ratio(&self) -> f64 {
        match self.total() {
            0 => 1.0,
            total => f64::from(self.sum) / f64::from(total),
        }
    }
}

/// Classify every event of `category` for one member
///
/// `attended` and `excused` are the member's sub-maps (event id → record);
/// `None` means the member has nothing recorded in that map.
pub fn get_type_counts<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    attended: Option<&HashMap<String, AttendanceRecord>>,
    excused: Option<&HashMap<String, ExcuseRecord>>,
    category: &str,
) -> TypeCounts {
    let mut counts = TypeCounts::default();

    for event in events.into_iter().filter(|e| e.category == category) {
        let was_present = attended.is_some_and(|a| a.contains_key(&event.id));
        let was_excused = excused
            .and_then(|e| e.get(&event.id))
            .is_some_and(|excuse| excuse.approval.is_approved());

        if was_present {
            counts.attended += 1;
        } else if was_excused {
            counts.excused += 1;
        } else {
            counts.pending += 1;
        }
    }

    counts.sum = counts.attended + counts.excused;
    counts
}
