//! Merge engines
//!
//! Every merge folds a freshly fetched, partial payload into the normalized
//! store by keyed replacement. Nothing is ever removed through this path: an
//! entry can be superseded by a later write to the same key, and entries
//! outside the fetch's scope are left exactly as they were. Keyed replacement
//! makes each merge idempotent, so duplicate or out-of-order delivery of the
//! same payload is harmless.

mod records;
mod voting;

pub use records::{Records, merge_records};
pub use voting::{
    CandidateIndex, VoteBuckets, VotingState, VotingView, active_session, merge_candidates,
    merge_sessions, merge_votes, recompute_voting_state,
};

use std::collections::HashMap;
use std::hash::Hash;

/// Fold `incoming` into `current`, replacing by key; last write wins
pub fn merge_keyed<K, V, I, F>(mut current: HashMap<K, V>, incoming: I, key: F) -> HashMap<K, V>
where
    K: Eq + Hash,
    I: IntoIterator<Item = V>,
    F: Fn(&V) -> K,
{
    for value in incoming {
        current.insert(key(&value), value);
    }
    current
}
