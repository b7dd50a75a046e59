//! Attendance and Excuse Models

use serde::{Deserialize, Serialize};

use super::member::member_key;

/// Verified check-in of a member at an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Member email
    pub email: String,
    pub event_id: String,
}

impl AttendanceRecord {
    pub fn new(email: impl Into<String>, event_id: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            event_id: event_id.into(),
        }
    }

    /// Key of the member sub-map this record belongs to
    pub fn member_key(&self) -> String {
        member_key(&self.email)
    }
}

/// Review state of an excuse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approval {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl Approval {
    /// Decode the wire pair; an unreviewed excuse is pending whatever `approved` says
    pub fn from_flags(approved: u8, reviewed: u8) -> Self {
        match (reviewed != 0, approved != 0) {
            (false, _) => Self::Pending,
            (true, true) => Self::Approved,
            (true, false) => Self::Rejected,
        }
    }

    /// Encode as `(approved, reviewed)`
    pub fn to_flags(self) -> (u8, u8) {
        match self {
            Self::Pending => (0, 0),
            Self::Approved => (1, 1),
            Self::Rejected => (0, 1),
        }
    }

    pub fn is_approved(self) -> bool {
        self == Self::Approved
    }
}

/// Excuse submitted by a member for an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ExcuseWire", into = "ExcuseWire")]
pub struct ExcuseRecord {
    pub email: String,
    pub event_id: String,
    pub reason: String,
    pub approval: Approval,
    pub late: bool,
}

impl ExcuseRecord {
    pub fn member_key(&self) -> String {
        member_key(&self.email)
    }
}

/// Server representation of an excuse, with 0/1 flags
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExcuseWire {
    email: String,
    event_id: String,
    reason: String,
    approved: u8,
    reviewed: u8,
    late: u8,
}

impl From<ExcuseWire> for ExcuseRecord {
    fn from(wire: ExcuseWire) -> Self {
        Self {
            email: wire.email,
            event_id: wire.event_id,
            reason: wire.reason,
            approval: Approval::from_flags(wire.approved, wire.reviewed),
            late: wire.late != 0,
        }
    }
}

impl From<ExcuseRecord> for ExcuseWire {
    fn from(record: ExcuseRecord) -> Self {
        let (approved, reviewed) = record.approval.to_flags();
        Self {
            email: record.email,
            event_id: record.event_id,
            reason: record.reason,
            approved,
            reviewed,
            late: u8::from(record.late),
        }
    }
}

/// One fetched slice of attendance and excuse records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsBatch {
    pub attended: Vec<AttendanceRecord>,
    pub excused: Vec<ExcuseRecord>,
}
