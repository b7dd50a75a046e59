//! Point requirements by class year

use super::class_year::ClassYear;
use shared::models::PointCategory;

/// Minimums a member must reach during the term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub professional: u32,
    pub philanthropy: u32,
    pub brotherhood: u32,
    pub rush: u32,
    pub diversity: u32,
    pub chat: u32,
    /// Minimum on the grand total across all categories
    pub any: u32,
    /// General-meeting attendance target, in percent
    pub gm_percent: u32,
}

impl Requirement {
    /// Minimum for one category
    pub fn minimum(&self, category: PointCategory) -> u32 {
        match category {
            PointCategory::Professional => self.professional,
            PointCategory::Philanthropy => self.philanthropy,
            PointCategory::Brotherhood => self.brotherhood,
            PointCategory::Rush => self.rush,
            PointCategory::Diversity => self.diversity,
            PointCategory::Chat => self.chat,
        }
    }
}

const FRESHMAN: Requirement = Requirement {
    professional: 1,
    philanthropy: 1,
    brotherhood: 2,
    rush: 1,
    diversity: 1,
    chat: 1,
    any: 8,
    gm_percent: 80,
};

const SOPHOMORE: Requirement = Requirement {
    professional: 2,
    philanthropy: 1,
    brotherhood: 2,
    rush: 1,
    diversity: 1,
    chat: 1,
    any: 10,
    gm_percent: 75,
};

const JUNIOR: Requirement = Requirement {
    professional: 2,
    philanthropy: 2,
    brotherhood: 1,
    rush: 1,
    diversity: 1,
    chat: 0,
    any: 10,
    gm_percent: 70,
};

const SENIOR: Requirement = Requirement {
    professional: 1,
    philanthropy: 1,
    brotherhood: 1,
    rush: 0,
    diversity: 1,
    chat: 0,
    any: 6,
    gm_percent: 60,
};

/// Row of the requirement table for a class year
pub fn requirement_for(class_year: ClassYear) -> &'static Requirement {
    match class_year {
        ClassYear::Freshman => &FRESHMAN,
        ClassYear::Sophomore => &SOPHOMORE,
        ClassYear::Junior => &JUNIOR,
        ClassYear::Senior => &SENIOR,
    }
}
