//! Sync Demo
//!
//! Drives the sync core against a canned in-memory backend:
//! 1. Loads events, the directory, one member's records, and the active vote
//! 2. Submits a vote and shows the tally
//! 3. Prints the member's standing
//!
//! Run: RUST_LOG=chapter_client=debug cargo run --example sync_demo

use async_trait::async_trait;
use chapter_client::aggregate::tally_votes;
use chapter_client::models::VoteSubmission;
use chapter_client::{ChapterSync, FetchRequest, FetchResponse, Fetcher, MemoryStore, SyncConfig};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

const MEMBER: &str = "alice@example.com";

/// Backend answering every read with fixed data
struct CannedBackend;

#[async_trait]
impl Fetcher for CannedBackend {
    async fn fetch(&self, request: FetchRequest) -> FetchResponse<Value> {
        match request {
            FetchRequest::Events => FetchResponse::ok(json!([
                {
                    "id": "1", "creator": "sec@example.com", "category": "GM", "code": "K9QZ",
                    "mandatory": true, "excusable": true, "title": "Chapter",
                    "description": "", "start": "2026-10-05T19:00:00Z", "duration": 60,
                    "location": "Hall", "points": ""
                },
                {
                    "id": "2", "creator": "sec@example.com", "category": "GM", "code": "M3TX",
                    "mandatory": true, "excusable": true, "title": "Chapter",
                    "description": "", "start": "2026-10-12T19:00:00Z", "duration": 60,
                    "location": "Hall", "points": ""
                },
                {
                    "id": "3", "creator": "vp@example.com", "category": "PH", "code": "F00D",
                    "mandatory": false, "excusable": false, "title": "Food bank",
                    "description": "Sorting shift", "start": "2026-10-10T14:00:00Z",
                    "duration": 180, "location": "Downtown", "points": "PH:2,BR:1"
                }
            ])),
            FetchRequest::Directory => FetchResponse::ok(json!([{
                "email": MEMBER, "first_name": "Alice", "last_name": "Avery",
                "role": "Brother", "privileged": false, "first_year": 2024,
                "grad_term": "Spring 2028", "pledge_class": "Fall 2024", "phone": "555-0100"
            }])),
            FetchRequest::MemberRecords(_) => FetchResponse::ok(json!({
                "attended": [
                    { "email": MEMBER, "event_id": "1" },
                    { "email": MEMBER, "event_id": "3" }
                ],
                "excused": [
                    { "email": MEMBER, "event_id": "2", "reason": "Exam",
                      "approved": 1, "reviewed": 1, "late": 0 }
                ]
            })),
            FetchRequest::Voting => FetchResponse::ok(json!({
                "candidates": [{
                    "id": "c1", "email": "carl@example.com", "first_name": "Carl",
                    "last_name": "Cole", "approved": true, "events": ["1"]
                }],
                "sessions": [{
                    "id": "s1", "name": "Fall bids", "start": "2026-10-16T17:00:00Z",
                    "operator": "pres@example.com", "candidates": ["c1"],
                    "current_candidate": "c1", "active": true
                }]
            })),
            FetchRequest::SubmitVote(submission) => FetchResponse::ok(json!({
                "id": "v1",
                "session_id": submission.session_id,
                "candidate_id": submission.candidate_id,
                "email": MEMBER,
                "verdict": submission.verdict,
                "reason": submission.reason
            })),
            _ => FetchResponse::unreachable(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let sync = ChapterSync::new(CannedBackend, MemoryStore::new(), SyncConfig::default());
    sync.restore().await?;

    for request in [
        FetchRequest::Events,
        FetchRequest::Directory,
        FetchRequest::MemberRecords(MEMBER.to_string()),
        FetchRequest::Voting,
    ] {
        let name = request.name();
        let outcome = sync.load(request, false).await?;
        println!("{name:<16} {outcome:?}");
    }

    let Some(session) = sync.active_session().await else {
        anyhow::bail!("no active voting session");
    };
    let Some(candidate_id) = session.current_candidate.clone() else {
        anyhow::bail!("session {} has no current candidate", session.id);
    };

    sync.submit_vote(VoteSubmission {
        session_id: session.id.clone(),
        candidate_id: candidate_id.clone(),
        verdict: true,
        reason: None,
    })
    .await?;

    let tally = sync
        .with_store(|store| tally_votes(store.voting.votes_for(&session.id, &candidate_id)))
        .await;
    println!("\n{} / {}: {} approve, {} reject", session.name, candidate_id, tally.approve, tally.reject);

    let Some(standing) = sync.standing(MEMBER).await else {
        anyhow::bail!("{MEMBER} is not in the directory");
    };

    println!("\n{MEMBER} ({})", standing.class_year);
    for status in &standing.categories {
        let mark = if status.satisfied { "ok" } else { "--" };
        println!("  {mark} {:<3} {}/{}", status.category, status.earned, status.required);
    }
    println!(
        "  GM attendance {:.0}% (target {}%)",
        standing.gm_ratio() * 100.0,
        standing.requirement.gm_percent
    );

    Ok(())
}
