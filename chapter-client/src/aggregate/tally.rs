//! Vote tallies

use shared::models::Vote;

/// Approve/reject counts for one candidate in one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub approve: u32,
    pub reject: u32,
}

impl VoteTally {
    pub fn total(&self) -> u32 {
        self.approve + self.reject
    }
}

pub fn tally_votes(bucket: &[Vote]) -> VoteTally {
    bucket.iter().fold(VoteTally::default(), |mut tally, vote| {
        if vote.verdict {
            tally.approve += 1;
        } else {
            tally.reject += 1;
        }
        tally
    })
}
