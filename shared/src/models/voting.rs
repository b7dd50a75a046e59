//! Voting Models (candidates, sessions, votes)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::member::member_key;
use crate::error::{AppError, AppResult, ErrorCode};

/// Candidate up for a vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the candidate has been approved to stand
    pub approved: bool,
    /// Identifiers of events the candidate attended
    pub events: Vec<String>,
}

impl Candidate {
    pub fn key(&self) -> String {
        member_key(&self.email)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Voting session run by an operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub start: DateTime<Utc>,
    /// Operator email
    pub operator: String,
    /// Candidate identifiers in ballot order
    pub candidates: Vec<String>,
    /// Candidate currently being voted on
    pub current_candidate: Option<String>,
    pub active: bool,
}

/// A single member's verdict on a candidate within a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: String,
    pub session_id: String,
    pub candidate_id: String,
    /// Voter email
    pub email: String,
    /// `true` approves, `false` rejects
    pub verdict: bool,
    /// Present when the verdict is a rejection
    pub reason: Option<String>,
}

impl Vote {
    pub fn voter_key(&self) -> String {
        member_key(&self.email)
    }
}

/// Vote as submitted by the current member, before the server assigns an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSubmission {
    pub session_id: String,
    pub candidate_id: String,
    pub verdict: bool,
    pub reason: Option<String>,
}

impl VoteSubmission {
    /// Reject locally what the server would blame anyway
    pub fn validate(&self) -> AppResult<()> {
        let has_reason = self
            .reason
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());

        if !self.verdict && !has_reason {
            return Err(AppError::new(ErrorCode::ReasonRequired)
                .with_detail("reason", ErrorCode::ReasonRequired.message()));
        }
        Ok(())
    }
}

/// Payload of the active-votes fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingPayload {
    pub candidates: Vec<Candidate>,
    pub sessions: Vec<Session>,
}
