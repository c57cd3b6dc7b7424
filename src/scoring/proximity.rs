//! Locality-only scoring (location mode).
//!
//! Uses nothing but city/region adjacency and age distance, so it works
//! for users and candidates with no embedding at all.

use chrono::{NaiveDate, Utc};

use crate::constants::{
    AGE_ADJACENT_CLOSE_BONUS, AGE_ADJACENT_FAR_BONUS, AGE_ADJACENT_NEAR_BONUS, PROXIMITY_BASELINE,
    PROXIMITY_SAME_CITY, PROXIMITY_SAME_REGION,
};
use crate::profile::Profile;

use super::types::ScoreBreakdown;

/// Scores candidates by locality and age adjacency.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProximityScorer;

impl ProximityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Scores `candidate` against `user` using today's date for ages.
    pub fn score(&self, user: &Profile, candidate: &Profile) -> ScoreBreakdown {
        self.score_on(user, candidate, Utc::now().date_naive())
    }

    /// Scores with an explicit reference date (deterministic in tests).
    pub fn score_on(&self, user: &Profile, candidate: &Profile, today: NaiveDate) -> ScoreBreakdown {
        let mut rationale = Vec::new();

        let base = if user.location.same_city(&candidate.location) {
            rationale.push("same city".to_string());
            PROXIMITY_SAME_CITY
        } else if user.location.same_region(&candidate.location) {
            rationale.push("same region".to_string());
            PROXIMITY_SAME_REGION
        } else {
            PROXIMITY_BASELINE
        };

        let bonus = match (user.age_on(today), candidate.age_on(today)) {
            (Some(a), Some(b)) => {
                let delta = a.abs_diff(b);
                if delta <= 2 {
                    AGE_ADJACENT_CLOSE_BONUS
                } else if delta <= 5 {
                    AGE_ADJACENT_NEAR_BONUS
                } else if delta <= 10 {
                    AGE_ADJACENT_FAR_BONUS
                } else {
                    0.0
                }
            }
            _ => 0.0,
        };
        if bonus > 0.0 {
            rationale.push("close in age".to_string());
        }

        let mut breakdown = ScoreBreakdown::from_parts(base, bonus, 1.0);
        breakdown.raw = breakdown.raw.min(1.0);
        breakdown.rationale = rationale;
        breakdown
    }
}
