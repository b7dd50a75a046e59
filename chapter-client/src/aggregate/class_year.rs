//! Class year derivation

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seniority tier used to pick point requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassYear {
    #[serde(rename = "FR")]
    Freshman,
    #[serde(rename = "SO")]
    Sophomore,
    #[serde(rename = "JR")]
    Junior,
    #[serde(rename = "SR")]
    Senior,
}

impl ClassYear {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Freshman => "FR",
            Self::Sophomore => "SO",
            Self::Junior => "JR",
            Self::Senior => "SR",
        }
    }
}

impl fmt::Display for ClassYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Academic years start on August 1st
pub fn academic_start(first_year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(first_year, 8, 1)
}

/// Fractional years from `start` to `today`
///
/// Whole years count calendar anniversaries, so the anniversary date itself
/// is an exact integer; the remainder is the share of days elapsed in the
/// current year. Dates before `start` give 0.0.
pub fn elapsed_years(start: NaiveDate, today: NaiveDate) -> f64 {
    if today <= start {
        return 0.0;
    }

    let anniversary = |years: i32| {
        u32::try_from(years)
            .ok()
            .and_then(|y| start.checked_add_months(Months::new(12 * y)))
    };

    let mut whole = today.year() - start.year();
    while whole > 0 && anniversary(whole).is_none_or(|date| date > today) {
        whole -= 1;
    }

    let (Some(base), Some(next)) = (anniversary(whole), anniversary(whole + 1)) else {
        return f64::from(whole);
    };

    let span = (next - base).num_days() as f64;
    f64::from(whole) + (today - base).num_days() as f64 / span
}

/// Class year of a member who first attended in `first_year`, as of `today`
///
/// Thresholds are checked from the senior tier down, so an exact boundary
/// lands on the more senior tier.
pub fn class_year(first_year: i32, today: NaiveDate) -> ClassYear {
    let Some(start) = academic_start(first_year) else {
        return ClassYear::Freshman;
    };

    let years = elapsed_years(start, today);
    if years >= 3.0 {
        ClassYear::Senior
    } else if years >= 2.0 {
        ClassYear::Junior
    } else if years >= 1.0 {
        ClassYear::Sophomore
    } else {
        ClassYear::Freshman
    }
}
