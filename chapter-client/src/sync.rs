//! Sync coordinator
//!
//! Owns the session's mutable state and drives the fetch → merge cycle:
//! it asks the freshness tracker whether a slice needs loading, guards against
//! overlapping requests for the same key, hands the decoded payload to the
//! store, and records timestamps and failures.

use crate::aggregate::{MemberStanding, member_standing};
use crate::config::SyncConfig;
use crate::error::{ClientError, ClientResult};
use crate::fetch::{FetchRequest, Fetcher, decode};
use crate::freshness::{Clock, LoadHistory, ResourceKey, SystemClock};
use crate::storage::KeyValueStore;
use crate::store::{ChapterStore, StoreUpdate};
use chrono::{DateTime, Utc};
use shared::FetchResponse;
use shared::models::{
    Event, ExcuseRecord, Member, MemberEdit, RecordsBatch, Session, Vote, VoteSubmission,
    VotingPayload, member_key,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// What a call to [`ChapterSync::load`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fetched and merged
    Fetched,
    /// Skipped, the last load is within its TTL
    Fresh,
    /// Skipped, a request for the same key is already running
    InFlight,
    /// Skipped, the key has an unresolved error
    Blocked,
    /// Fetched, but the session was signed out before the response arrived
    Discarded,
}

#[derive(Debug, Default)]
struct SyncState {
    store: ChapterStore,
    history: LoadHistory,
    /// History persisted by a previous run, for display only
    previous: LoadHistory,
    in_flight: HashSet<ResourceKey>,
    errors: HashMap<ResourceKey, ClientError>,
    session_error: Option<ClientError>,
    /// Bumped on sign-out; responses from an older generation are dropped
    generation: u64,
}

impl SyncState {
    fn reset(&mut self) {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            generation,
            ..Self::default()
        };
    }
}

/// Session-scoped sync coordinator
pub struct ChapterSync<F, S> {
    fetcher: F,
    storage: S,
    config: SyncConfig,
    clock: Arc<dyn Clock>,
    state: RwLock<SyncState>,
}

impl<F: Fetcher, S: KeyValueStore> ChapterSync<F, S> {
    pub fn new(fetcher: F, storage: S, config: SyncConfig) -> Self {
        Self {
            fetcher,
            storage,
            config,
            clock: Arc::new(SystemClock),
            state: RwLock::new(SyncState::default()),
        }
    }

    /// Replace the clock (tests, simulations)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Read the history persisted by a previous run
    ///
    /// The store itself is not persisted, so restored timestamps only feed
    /// [`last_loaded_at`](Self::last_loaded_at); they never suppress a fetch.
    pub async fn restore(&self) -> ClientResult<()> {
        let Some(json) = self.storage.get(&self.config.history_key).await? else {
            return Ok(());
        };

        let previous = match LoadHistory::from_json(&json) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable load history");
                LoadHistory::new()
            }
        };

        tracing::debug!(entries = previous.len(), "Restored load history");
        self.state.write().await.previous = previous;
        Ok(())
    }

    /// Load a resource if it is stale, or unconditionally when `force` is set
    ///
    /// A forced load clears the key's recorded error and bypasses the TTL,
    /// but still will not overlap a request already in flight for that key.
    ///
    /// A response that arrives after [`sign_out`](Self::sign_out) is dropped
    /// without touching the store, the history or the recorded errors.
    pub async fn load(&self, request: FetchRequest, force: bool) -> ClientResult<LoadOutcome> {
        let key = request.key().ok_or_else(|| {
            ClientError::Unexpected(format!("{} is not a loadable resource", request.name()))
        })?;
        let ttl = key
            .kind()
            .map(|kind| self.config.ttl_for(kind))
            .unwrap_or(self.config.default_ttl);

        let generation = {
            let mut state = self.state.write().await;

            if state.in_flight.contains(&key) {
                tracing::debug!(key = %key, "Load skipped, already in flight");
                return Ok(LoadOutcome::InFlight);
            }

            if force {
                state.errors.remove(&key);
            } else if state.errors.contains_key(&key) {
                tracing::debug!(key = %key, "Load skipped, error not cleared");
                return Ok(LoadOutcome::Blocked);
            } else if !state.history.is_stale(&key, ttl, self.clock.now()) {
                return Ok(LoadOutcome::Fresh);
            }

            state.in_flight.insert(key.clone());
            state.generation
        };

        tracing::debug!(key = %key, force, "Fetching");
        let response = self.fetcher.fetch(request.clone()).await;
        let result = decode_update(&request, response);

        // Held through the storage write so a sign-out cannot land in between
        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(key = %key, "Dropping response from a signed-out session");
            return match result {
                Ok(_) => Ok(LoadOutcome::Discarded),
                Err(err) => Err(err),
            };
        }
        state.in_flight.remove(&key);

        match result {
            Ok(update) => {
                let store = std::mem::take(&mut state.store);
                state.store = store.apply(update);
                state.history.record(key.clone(), self.clock.now());
                state.errors.remove(&key);

                tracing::info!(key = %key, "Loaded");
                self.persist_history(state.history.to_json()).await;
                Ok(LoadOutcome::Fetched)
            }
            Err(err) => {
                Self::record_failure(&mut state, Some(&key), &err);
                Err(err)
            }
        }
    }

    /// Submit the current member's vote and merge the stored result
    pub async fn submit_vote(&self, submission: VoteSubmission) -> ClientResult<Vote> {
        submission.validate()?;

        let generation = self.state.read().await.generation;
        let response = self
            .fetcher
            .fetch(FetchRequest::SubmitVote(submission))
            .await;
        let result = decode::<Vote>(response);

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!("Dropping vote response from a signed-out session");
            return result;
        }

        match result {
            Ok(vote) => {
                let store = std::mem::take(&mut state.store);
                state.store = store.apply(StoreUpdate::Votes(vec![vote.clone()]));
                tracing::info!(vote_id = %vote.id, session_id = %vote.session_id, "Vote submitted");
                Ok(vote)
            }
            Err(err) => {
                Self::record_failure(&mut state, None, &err);
                Err(err)
            }
        }
    }

    /// Save self-editable member fields and merge the returned profile
    pub async fn update_member(&self, edit: MemberEdit) -> ClientResult<Member> {
        let generation = self.state.read().await.generation;
        let response = self
            .fetcher
            .fetch(FetchRequest::UpdateMember(edit))
            .await;
        let result = decode::<Member>(response);

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!("Dropping profile response from a signed-out session");
            return result;
        }

        match result {
            Ok(member) => {
                let store = std::mem::take(&mut state.store);
                state.store = store.apply(StoreUpdate::Member(member.clone()));
                Ok(member)
            }
            Err(err) => {
                Self::record_failure(&mut state, None, &err);
                Err(err)
            }
        }
    }

    /// Drop everything known for this session
    pub async fn sign_out(&self) -> ClientResult<()> {
        let mut state = self.state.write().await;
        state.reset();
        self.storage.remove(&self.config.history_key).await?;
        tracing::info!("Signed out, store reset");
        Ok(())
    }

    /// Clear every per-key error and the session error
    pub async fn dismiss_errors(&self) {
        let mut state = self.state.write().await;
        state.errors.clear();
        state.session_error = None;
    }

    pub async fn error_for(&self, key: &ResourceKey) -> Option<ClientError> {
        self.state.read().await.errors.get(key).cloned()
    }

    /// Error that invalidates the whole session, if one occurred
    pub async fn session_error(&self) -> Option<ClientError> {
        self.state.read().await.session_error.clone()
    }

    pub async fn is_in_flight(&self, key: &ResourceKey) -> bool {
        self.state.read().await.in_flight.contains(key)
    }

    /// Last successful load of `key`, this session or a previous run
    pub async fn last_loaded_at(&self, key: &ResourceKey) -> Option<DateTime<Utc>> {
        let state = self.state.read().await;
        state
            .history
            .last_loaded(key)
            .or_else(|| state.previous.last_loaded(key))
    }

    /// Copy of the store for rendering
    pub async fn snapshot(&self) -> ChapterStore {
        self.state.read().await.store.clone()
    }

    /// Run a read-only projection against the store
    pub async fn with_store<R>(&self, f: impl FnOnce(&ChapterStore) -> R) -> R {
        f(&self.state.read().await.store)
    }

    pub async fn standing(&self, email: &str) -> Option<MemberStanding> {
        let today = self.clock.now().date_naive();
        self.with_store(|store| member_standing(store, email, today))
            .await
    }

    pub async fn active_session(&self) -> Option<Session> {
        self.with_store(|store| store.voting.active.clone()).await
    }

    fn record_failure(state: &mut SyncState, key: Option<&ResourceKey>, err: &ClientError) {
        if let Some(key) = key {
            state.errors.insert(key.clone(), err.clone());
        }

        if err.is_session_fatal() {
            tracing::error!(
                key = ?key.map(ResourceKey::as_str),
                category = err.category().name(),
                error = %err,
                "Session credentials rejected"
            );
            state.session_error = Some(err.clone());
        } else {
            tracing::warn!(
                key = ?key.map(ResourceKey::as_str),
                category = err.category().name(),
                code = err.code().code(),
                error = %err,
                "Fetch failed"
            );
        }
    }

    async fn persist_history(&self, json: serde_json::Result<String>) {
        let result = match json {
            Ok(json) => self.storage.set(&self.config.history_key, json).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist load history");
        }
    }
}

/// Decode a read response into the store update it carries
///
/// Records outside the request's scope are dropped so a scoped fetch can
/// only ever write into its own slice.
fn decode_update(
    request: &FetchRequest,
    response: FetchResponse<serde_json::Value>,
) -> ClientResult<StoreUpdate> {
    let update = match request {
        FetchRequest::Events => StoreUpdate::Events(decode::<Vec<Event>>(response)?),
        FetchRequest::Directory => StoreUpdate::Directory(decode::<Vec<Member>>(response)?),
        FetchRequest::Member(_) | FetchRequest::UpdateMember(_) => {
            StoreUpdate::Member(decode::<Member>(response)?)
        }
        FetchRequest::MemberRecords(email) => {
            let scope = member_key(email);
            let batch = scoped_batch(decode(response)?, |member, _| member == scope);
            StoreUpdate::Records(batch)
        }
        FetchRequest::EventRecords(event_id) => {
            let batch = scoped_batch(decode(response)?, |_, event| event == event_id);
            StoreUpdate::Records(batch)
        }
        FetchRequest::Excuses => StoreUpdate::Records(RecordsBatch {
            attended: Vec::new(),
            excused: decode::<Vec<ExcuseRecord>>(response)?,
        }),
        FetchRequest::Voting => StoreUpdate::Voting(decode::<VotingPayload>(response)?),
        FetchRequest::Votes {
            session_id,
            candidate_id,
        } => {
            let votes: Vec<Vote> = decode(response)?;
            let total = votes.len();
            let votes: Vec<Vote> = votes
                .into_iter()
                .filter(|v| &v.session_id == session_id && &v.candidate_id == candidate_id)
                .collect();
            if votes.len() != total {
                tracing::warn!(dropped = total - votes.len(), "Dropped votes outside requested pair");
            }
            StoreUpdate::Votes(votes)
        }
        FetchRequest::SubmitVote(_) => StoreUpdate::Votes(vec![decode::<Vote>(response)?]),
    };
    Ok(update)
}

fn scoped_batch(batch: RecordsBatch, in_scope: impl Fn(&str, &str) -> bool) -> RecordsBatch {
    let total = batch.attended.len() + batch.excused.len();

    let attended: Vec<_> = batch
        .attended
        .into_iter()
        .filter(|r| in_scope(&r.member_key(), &r.event_id))
        .collect();
    let excused: Vec<_> = batch
        .excused
        .into_iter()
        .filter(|r| in_scope(&r.member_key(), &r.event_id))
        .collect();

    let kept = attended.len() + excused.len();
    if kept != total {
        tracing::warn!(dropped = total - kept, "Dropped records outside fetch scope");
    }

    RecordsBatch { attended, excused }
}
