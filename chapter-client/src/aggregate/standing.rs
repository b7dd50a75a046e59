//! Member standing: point totals against the requirement table

use super::class_year::{ClassYear, class_year};
use super::counts::{TypeCounts, get_type_counts};
use super::requirements::{Requirement, requirement_for};
use crate::store::ChapterStore;
use chrono::NaiveDate;
use shared::models::{AttendanceRecord, Event, GENERAL_MEETING, PointCategory};
use std::collections::{BTreeMap, HashMap};

/// Points earned per category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointTotals {
    by_category: BTreeMap<PointCategory, u32>,
}

impl PointTotals {
    /// Sum the point specifications of every event the member attended
    pub fn from_attendance<'a>(
        events: impl IntoIterator<Item = &'a Event>,
        attended: Option<&HashMap<String, AttendanceRecord>>,
    ) -> Self {
        let mut totals = Self::default();
        let Some(attended) = attended else {
            return totals;
        };

        for event in events.into_iter().filter(|e| attended.contains_key(&e.id)) {
            for (category, count) in event.point_values() {
                *totals.by_category.entry(category).or_default() += count;
            }
        }
        totals
    }

    pub fn get(&self, category: PointCategory) -> u32 {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.by_category.values().sum()
    }
}

/// One row of the satisfied/unsatisfied display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStatus {
    pub category: PointCategory,
    pub earned: u32,
    pub required: u32,
    pub satisfied: bool,
}

/// Projection of a member's live totals onto their requirement row
#[derive(Debug, Clone, PartialEq)]
pub struct MemberStanding {
    pub email: String,
    pub class_year: ClassYear,
    pub totals: PointTotals,
    pub general_meetings: TypeCounts,
    pub requirement: Requirement,
    pub categories: Vec<CategoryStatus>,
    pub any_satisfied: bool,
    pub gm_satisfied: bool,
}

impl MemberStanding {
    pub fn evaluate(
        email: impl Into<String>,
        class_year: ClassYear,
        totals: PointTotals,
        general_meetings: TypeCounts,
    ) -> Self {
        let requirement = *requirement_for(class_year);

        let categories = PointCategory::ALL
            .into_iter()
            .map(|category| {
                let earned = totals.get(category);
                let required = requirement.minimum(category);
                CategoryStatus {
                    category,
                    earned,
                    required,
                    satisfied: earned >= required,
                }
            })
            .collect();

        let any_satisfied = totals.total() >= requirement.any;
        let gm_satisfied = u64::from(general_meetings.sum) * 100
            >= u64::from(requirement.gm_percent) * u64::from(general_meetings.total());

        Self {
            email: email.into(),
            class_year,
            totals,
            general_meetings,
            requirement,
            categories,
            any_satisfied,
            gm_satisfied,
        }
    }

    /// General-meeting attendance ratio
    pub fn gm_ratio(&self) -> f64 {
        self.general_meetings.ratio()
    }

    pub fn status(&self, category: PointCategory) -> Option<&CategoryStatus> {
        self.categories.iter().find(|s| s.category == category)
    }

    pub fn all_satisfied(&self) -> bool {
        self.any_satisfied && self.gm_satisfied && self.categories.iter().all(|s| s.satisfied)
    }
}

/// Standing of a directory member as of `today`; `None` if not in the directory
pub fn member_standing(store: &ChapterStore, email: &str, today: NaiveDate) -> Option<MemberStanding> {
    let member = store.member(email)?;
    let attended = store.records.attended_by(email);
    let excused = store.records.excused_by(email);

    let totals = PointTotals::from_attendance(store.events.values(), attended);
    let general_meetings = get_type_counts(store.events.values(), attended, excused, GENERAL_MEETING);

    Some(MemberStanding::evaluate(
        member.key(),
        class_year(member.first_year, today),
        totals,
        general_meetings,
    ))
}
