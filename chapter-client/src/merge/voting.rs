//! Voting merging: candidates, sessions, votes, and the derived views

use super::merge_keyed;
use shared::models::{Candidate, Session, Vote, VotingPayload};
use std::collections::{BTreeMap, HashMap};

/// Canonical candidate index, keyed by email
pub type CandidateIndex = HashMap<String, Candidate>;

/// session id → candidate id → votes
pub type VoteBuckets = HashMap<String, HashMap<String, Vec<Vote>>>;

/// Views derived from the canonical candidate index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VotingView {
    /// Candidates keyed by identifier
    pub by_id: HashMap<String, Candidate>,
    /// All candidates, name-sorted
    pub sorted: Vec<Candidate>,
    pub approved: Vec<Candidate>,
    pub unapproved: Vec<Candidate>,
}

/// Keyed replacement of candidates by email
///
/// A candidate id is held by one email at a time: an incoming candidate whose
/// id is already indexed under another email evicts that entry.
pub fn merge_candidates(mut index: CandidateIndex, incoming: Vec<Candidate>) -> CandidateIndex {
    for candidate in incoming {
        let key = candidate.key();
        index.retain(|email, existing| {
            let moved = existing.id == candidate.id && *email != key;
            if moved {
                tracing::debug!(id = %candidate.id, from = %email, to = %key, "Candidate email changed");
            }
            !moved
        });
        index = merge_keyed(index, [candidate], Candidate::key);
    }
    index
}

/// Overwrite or insert sessions by id, then re-sort by start
///
/// Sessions starting at the same instant are ordered by id.
pub fn merge_sessions(sessions: Vec<Session>, incoming: Vec<Session>) -> Vec<Session> {
    let by_id: HashMap<String, Session> = sessions.into_iter().map(|s| (s.id.clone(), s)).collect();
    let by_id = merge_keyed(by_id, incoming, |s: &Session| s.id.clone());

    let mut merged: Vec<Session> = by_id.into_values().collect();
    merged.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    merged
}

/// Fold votes into their (session, candidate) buckets
///
/// Within a bucket a voter holds at most one vote: a newer vote from the same
/// voter replaces the old one even if the server issued it a new id, and a vote
/// whose id is already present replaces that entry. Votes for other pairs are
/// grouped into their own buckets; buckets not named by `incoming` are untouched.
pub fn merge_votes(mut buckets: VoteBuckets, incoming: Vec<Vote>) -> VoteBuckets {
    let mut grouped: BTreeMap<(String, String), Vec<Vote>> = BTreeMap::new();
    for vote in incoming {
        grouped
            .entry((vote.session_id.clone(), vote.candidate_id.clone()))
            .or_default()
            .push(vote);
    }

    if grouped.len() > 1 {
        tracing::debug!(pairs = grouped.len(), "Vote payload spans several session/candidate pairs");
    }

    for ((session_id, candidate_id), votes) in grouped {
        let bucket = buckets
            .entry(session_id)
            .or_default()
            .entry(candidate_id)
            .or_default();

        let mut by_voter: HashMap<String, Vote> =
            bucket.drain(..).map(|v| (v.voter_key(), v)).collect();

        for vote in votes {
            by_voter.retain(|_, existing| existing.id != vote.id);
            by_voter.insert(vote.voter_key(), vote);
        }

        let mut merged: Vec<Vote> = by_voter.into_values().collect();
        merged.sort_by(|a, b| a.id.cmp(&b.id));
        *bucket = merged;
    }

    buckets
}

/// Rebuild the id index and sorted/partitioned lists from the email index
pub fn recompute_voting_state(index: &CandidateIndex) -> VotingView {
    let by_id: HashMap<String, Candidate> = index
        .values()
        .map(|c| (c.id.clone(), c.clone()))
        .collect();

    let mut sorted: Vec<Candidate> = index.values().cloned().collect();
    sorted.sort_by_cached_key(|c| {
        (
            c.first_name.to_lowercase(),
            c.last_name.to_lowercase(),
            c.key(),
        )
    });

    let (approved, unapproved): (Vec<Candidate>, Vec<Candidate>) =
        sorted.iter().cloned().partition(|c| c.approved);

    VotingView {
        by_id,
        sorted,
        approved,
        unapproved,
    }
}

/// The first active session in start order, if any
///
/// More than one active session is a data-quality problem on the server; it is
/// logged and the earliest one is returned.
pub fn active_session(sessions: &[Session]) -> Option<&Session> {
    let mut active = sessions.iter().filter(|s| s.active);
    let first = active.next()?;

    let others: Vec<&str> = active.map(|s| s.id.as_str()).collect();
    if !others.is_empty() {
        tracing::warn!(
            chosen = %first.id,
            ignored = ?others,
            "Multiple voting sessions marked active"
        );
    }

    Some(first)
}

/// Everything known about the current vote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VotingState {
    pub candidates: CandidateIndex,
    pub view: VotingView,
    /// Sessions sorted by start
    pub sessions: Vec<Session>,
    pub active: Option<Session>,
    pub votes: VoteBuckets,
}

impl VotingState {
    /// Merge an active-votes payload and refresh every derived field
    pub fn apply_payload(self, payload: VotingPayload) -> Self {
        let candidates = merge_candidates(self.candidates, payload.candidates);
        let view = recompute_voting_state(&candidates);
        let sessions = merge_sessions(self.sessions, payload.sessions);
        let active = active_session(&sessions).cloned();

        tracing::debug!(
            candidates = candidates.len(),
            sessions = sessions.len(),
            active = ?active.as_ref().map(|s| s.id.as_str()),
            "Merged voting payload"
        );

        Self {
            candidates,
            view,
            sessions,
            active,
            votes: self.votes,
        }
    }

    pub fn apply_votes(mut self, votes: Vec<Vote>) -> Self {
        self.votes = merge_votes(self.votes, votes);
        self
    }

    /// Votes cast for a candidate in a session
    pub fn votes_for(&self, session_id: &str, candidate_id: &str) -> &[Vote] {
        self.votes
            .get(session_id)
            .and_then(|candidates| candidates.get(candidate_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Candidate currently being voted on in the active session
    pub fn current_candidate(&self) -> Option<&Candidate> {
        let id = self.active.as_ref()?.current_candidate.as_ref()?;
        self.view.by_id.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::HashSet;

    fn candidate(id: &str, email: &str, first: &str, approved: bool) -> Candidate {
        Candidate {
            id: id.to_string(),
            email: email.to_string(),
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            approved,
            events: vec![],
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, d, 19, 0, 0).unwrap()
    }

    fn session(id: &str, start: DateTime<Utc>, active: bool) -> Session {
        Session {
            id: id.to_string(),
            name: format!("Session {id}"),
            start,
            operator: "pres@example.com".to_string(),
            candidates: vec!["c1".to_string()],
            current_candidate: None,
            active,
        }
    }

    fn vote(id: &str, session_id: &str, candidate_id: &str, voter: &str, verdict: bool) -> Vote {
        Vote {
            id: id.to_string(),
            session_id: session_id.to_string(),
            candidate_id: candidate_id.to_string(),
            email: voter.to_string(),
            verdict,
            reason: (!verdict).then(|| "not ready".to_string()),
        }
    }

    #[test]
    fn test_merge_candidates_last_write_wins() {
        let index = merge_candidates(
            CandidateIndex::new(),
            vec![candidate("c1", "zed@example.com", "Zed", false)],
        );
        let index = merge_candidates(
            index,
            vec![
                candidate("c1", "zed@example.com", "Zed", true),
                candidate("c2", "amy@example.com", "Amy", false),
            ],
        );

        assert_eq!(index.len(), 2);
        assert!(index["zed@example.com"].approved);
    }

    #[test]
    fn test_candidate_email_change_keeps_indices_aligned() {
        let index = merge_candidates(
            CandidateIndex::new(),
            vec![
                candidate("c1", "old@example.com", "Cal", false),
                candidate("c2", "amy@example.com", "Amy", true),
            ],
        );
        let index = merge_candidates(index, vec![candidate("c1", "new@example.com", "Cal", true)]);
        let view = recompute_voting_state(&index);

        assert_eq!(index.len(), 2);
        assert_eq!(view.by_id.len(), index.len());
        assert_eq!(view.sorted.len(), 2);
        assert!(!index.contains_key("old@example.com"));
        assert_eq!(view.by_id["c1"].email, "new@example.com");
        assert!(view.unapproved.is_empty());
    }

    #[test]
    fn test_indices_hold_same_candidates_after_recompute() {
        let index = merge_candidates(
            CandidateIndex::new(),
            vec![
                candidate("c1", "zed@example.com", "Zed", true),
                candidate("c2", "amy@example.com", "Amy", false),
                candidate("c3", "bo@example.com", "Bo", true),
            ],
        );
        let view = recompute_voting_state(&index);

        let from_email: HashSet<&str> = index.values().map(|c| c.id.as_str()).collect();
        let from_id: HashSet<&str> = view.by_id.keys().map(String::as_str).collect();
        assert_eq!(from_email, from_id);
        for c in index.values() {
            assert_eq!(view.by_id.get(&c.id), Some(c));
        }

        let names: Vec<&str> = view.sorted.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Bo", "Zed"]);
        assert_eq!(view.approved.len(), 2);
        assert_eq!(view.unapproved.len(), 1);
        assert_eq!(view.unapproved[0].id, "c2");
    }

    #[test]
    fn test_merge_sessions_sorts_by_start() {
        let sessions = merge_sessions(vec![session("s2", day(9), false)], vec![session("s1", day(2), false)]);
        let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2"]);
    }

    #[test]
    fn test_merge_sessions_replaces_by_id() {
        let sessions = merge_sessions(vec![session("s1", day(2), true)], vec![session("s1", day(2), false)]);
        assert_eq!(sessions.len(), 1);
        assert!(!sessions[0].active);
    }

    #[test]
    fn test_merge_sessions_ties_break_by_id() {
        let sessions = merge_sessions(
            vec![session("b", day(3), false)],
            vec![session("c", day(3), false), session("a", day(3), false)],
        );
        let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_active_session_unique() {
        let sessions = merge_sessions(
            vec![session("s1", day(1), false)],
            vec![session("s2", day(2), true), session("s3", day(3), false)],
        );
        assert_eq!(active_session(&sessions).map(|s| s.id.as_str()), Some("s2"));
    }

    #[test]
    fn test_active_session_none() {
        let sessions = merge_sessions(vec![], vec![session("s1", day(1), false)]);
        assert!(active_session(&sessions).is_none());
    }

    #[test]
    fn test_two_active_sessions_pick_earliest() {
        let sessions = merge_sessions(
            vec![],
            vec![session("late", day(8), true), session("early", day(4), true)],
        );
        assert_eq!(active_session(&sessions).map(|s| s.id.as_str()), Some("early"));
        assert_eq!(active_session(&sessions).map(|s| s.id.as_str()), Some("early"));
    }

    #[test]
    fn test_vote_same_id_last_write_wins() {
        let buckets = merge_votes(VoteBuckets::new(), vec![vote("v1", "s1", "c1", "eve@example.com", true)]);
        let buckets = merge_votes(buckets, vec![vote("v1", "s1", "c1", "eve@example.com", false)]);

        let bucket = &buckets["s1"]["c1"];
        assert_eq!(bucket.len(), 1);
        assert!(!bucket[0].verdict);
    }

    #[test]
    fn test_revote_with_new_id_replaces_voter_entry() {
        let buckets = merge_votes(VoteBuckets::new(), vec![vote("v1", "s1", "c1", "eve@example.com", true)]);
        let buckets = merge_votes(buckets, vec![vote("v9", "s1", "c1", "Eve@Example.com", false)]);

        let bucket = &buckets["s1"]["c1"];
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].id, "v9");
    }

    #[test]
    fn test_votes_for_other_pairs_untouched() {
        let buckets = merge_votes(
            VoteBuckets::new(),
            vec![
                vote("v1", "s1", "c1", "eve@example.com", true),
                vote("v2", "s1", "c1", "fay@example.com", true),
            ],
        );
        let buckets = merge_votes(buckets, vec![vote("v3", "s1", "c2", "eve@example.com", false)]);

        assert_eq!(buckets["s1"]["c1"].len(), 2);
        assert_eq!(buckets["s1"]["c2"].len(), 1);
    }

    #[test]
    fn test_merge_votes_idempotent() {
        let incoming = vec![
            vote("v1", "s1", "c1", "eve@example.com", true),
            vote("v2", "s1", "c1", "fay@example.com", false),
        ];
        let once = merge_votes(VoteBuckets::new(), incoming.clone());
        let twice = merge_votes(once.clone(), incoming);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_voting_state_apply_payload() {
        let mut s1 = session("s1", day(1), true);
        s1.current_candidate = Some("c1".to_string());

        let state = VotingState::default().apply_payload(VotingPayload {
            candidates: vec![candidate("c1", "zed@example.com", "Zed", true)],
            sessions: vec![s1],
        });

        assert_eq!(state.active.as_ref().map(|s| s.id.as_str()), Some("s1"));
        assert_eq!(state.current_candidate().map(|c| c.id.as_str()), Some("c1"));
        assert_eq!(state.view.by_id.len(), state.candidates.len());

        let state = state.apply_votes(vec![vote("v1", "s1", "c1", "eve@example.com", true)]);
        assert_eq!(state.votes_for("s1", "c1").len(), 1);
        assert!(state.votes_for("s1", "c2").is_empty());
    }

    #[test]
    fn test_session_closing_clears_active() {
        let state = VotingState::default().apply_payload(VotingPayload {
            candidates: vec![],
            sessions: vec![session("s1", day(1), true)],
        });
        let state = state.apply_payload(VotingPayload {
            candidates: vec![],
            sessions: vec![session("s1", day(1), false)],
        });
        assert!(state.active.is_none());
    }
}
