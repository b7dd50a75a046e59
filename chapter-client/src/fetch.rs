//! Fetch boundary
//!
//! Transport lives outside the core. A [`Fetcher`] resolves a [`FetchRequest`]
//! into the envelope `{ success, code, data | error }` with `data` left as raw
//! JSON; [`decode`] turns it into a typed payload or a classified error.

use crate::error::{ClientError, ClientResult};
use crate::freshness::ResourceKey;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared::FetchResponse;
use shared::models::{MemberEdit, VoteSubmission};
use std::sync::Arc;

/// Every endpoint the sync core talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Full event catalog
    Events,
    /// Member directory
    Directory,
    /// One member profile
    Member(String),
    /// Attendance and excuses of one member
    MemberRecords(String),
    /// Attendance and excuses of one event
    EventRecords(String),
    /// All excuses (officer review)
    Excuses,
    /// Candidates and sessions of the active vote
    Voting,
    /// Votes cast for one candidate in one session
    Votes {
        session_id: String,
        candidate_id: String,
    },
    SubmitVote(VoteSubmission),
    UpdateMember(MemberEdit),
}

impl FetchRequest {
    /// Freshness key for read requests; writes are never freshness-gated
    pub fn key(&self) -> Option<ResourceKey> {
        match self {
            Self::Events => Some(ResourceKey::events()),
            Self::Directory => Some(ResourceKey::directory()),
            Self::Member(email) => Some(ResourceKey::member(email)),
            Self::MemberRecords(email) => Some(ResourceKey::points(email)),
            Self::EventRecords(event_id) => Some(ResourceKey::event_records(event_id)),
            Self::Excuses => Some(ResourceKey::excuses()),
            Self::Voting => Some(ResourceKey::voting()),
            Self::Votes {
                session_id,
                candidate_id,
            } => Some(ResourceKey::votes(session_id, candidate_id)),
            Self::SubmitVote(_) | Self::UpdateMember(_) => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Directory => "directory",
            Self::Member(_) => "member",
            Self::MemberRecords(_) => "member_records",
            Self::EventRecords(_) => "event_records",
            Self::Excuses => "excuses",
            Self::Voting => "voting",
            Self::Votes { .. } => "votes",
            Self::SubmitVote(_) => "submit_vote",
            Self::UpdateMember(_) => "update_member",
        }
    }
}

/// Opaque fetch capability
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> FetchResponse<serde_json::Value>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn fetch(&self, request: FetchRequest) -> FetchResponse<serde_json::Value> {
        (**self).fetch(request).await
    }
}

/// Turn an envelope into a typed payload
///
/// A successful envelope without data, or with data that does not match the
/// expected shape, is an unexpected error.
pub fn decode<T: DeserializeOwned>(response: FetchResponse<serde_json::Value>) -> ClientResult<T> {
    if !response.success {
        return Err(ClientError::from_response(response.code, response.error));
    }

    let data = response
        .data
        .ok_or_else(|| ClientError::Unexpected("Missing response data".to_string()))?;

    serde_json::from_value(data).map_err(|e| ClientError::Unexpected(e.to_string()))
}
