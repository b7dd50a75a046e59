//! Aggregation engine
//!
//! Derived views computed on demand from the normalized store: category
//! attendance counts, class year, point totals against the requirement table,
//! and vote tallies. Nothing here is cached; the inputs are one chapter's
//! worth of events and members.

mod class_year;
mod counts;
mod requirements;
mod standing;
mod tally;

pub use class_year::{ClassYear, academic_start, class_year, elapsed_years};
pub use counts::{TypeCounts, get_type_counts};
pub use requirements::{Requirement, requirement_for};
pub use standing::{CategoryStatus, MemberStanding, PointTotals, member_standing};
pub use tally::{VoteTally, tally_votes};
