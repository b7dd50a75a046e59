//! Normalized in-memory store
//!
//! The store is a plain value. Every fetch result becomes a [`StoreUpdate`]
//! and [`ChapterStore::apply`] produces the next value; the sync coordinator
//! is the only holder of the current one.

use crate::merge::{Records, VotingState, merge_keyed, merge_records};
use shared::models::{Event, Member, RecordsBatch, Vote, VotingPayload, member_key};
use std::collections::HashMap;

/// A fetched payload, ready to be folded into the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUpdate {
    Events(Vec<Event>),
    Directory(Vec<Member>),
    Member(Member),
    Records(RecordsBatch),
    Voting(VotingPayload),
    Votes(Vec<Vote>),
}

impl StoreUpdate {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Events(_) => "events",
            Self::Directory(_) => "directory",
            Self::Member(_) => "member",
            Self::Records(_) => "records",
            Self::Voting(_) => "voting",
            Self::Votes(_) => "votes",
        }
    }
}

/// Everything the client knows for the current session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterStore {
    /// Events by id
    pub events: HashMap<String, Event>,
    /// Members by normalized email
    pub members: HashMap<String, Member>,
    pub records: Records,
    pub voting: VotingState,
}

impl ChapterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one update into the store
    pub fn apply(self, update: StoreUpdate) -> Self {
        tracing::trace!(update = update.name(), "Applying store update");

        let Self {
            events,
            members,
            records,
            voting,
        } = self;

        match update {
            StoreUpdate::Events(incoming) => Self {
                events: merge_keyed(events, incoming, |e: &Event| e.id.clone()),
                members,
                records,
                voting,
            },
            StoreUpdate::Directory(incoming) => Self {
                events,
                members: merge_keyed(members, incoming, Member::key),
                records,
                voting,
            },
            StoreUpdate::Member(member) => Self {
                events,
                members: merge_keyed(members, [member], Member::key),
                records,
                voting,
            },
            StoreUpdate::Records(batch) => Self {
                events,
                members,
                records: merge_records(records, batch),
                voting,
            },
            StoreUpdate::Voting(payload) => Self {
                events,
                members,
                records,
                voting: voting.apply_payload(payload),
            },
            StoreUpdate::Votes(votes) => Self {
                events,
                members,
                records,
                voting: voting.apply_votes(votes),
            },
        }
    }

    pub fn member(&self, email: &str) -> Option<&Member> {
        self.members.get(&member_key(email))
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.get(id)
    }

    /// Events in start order
    pub fn events_by_start(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.values().collect();
        events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        events
    }

    /// Members sorted by last then first name
    pub fn directory(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.members.values().collect();
        members.sort_by_cached_key(|m| (m.last_name.to_lowercase(), m.first_name.to_lowercase()));
        members
    }
}
