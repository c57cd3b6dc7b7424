//! Per-user match settings.

use serde::{Deserialize, Serialize};

use super::GenderFilter;
use crate::constants::{DEFAULT_DAILY_QUOTA, DEFAULT_MIN_SCORE};

/// Relative importance of the three catalog categories.
///
/// The weights are independent multipliers; they are not required to sum
/// to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub movies: f32,
    pub music: f32,
    pub shows: f32,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            movies: 1.0,
            music: 1.0,
            shows: 1.0,
        }
    }
}

/// Per-user overrides for the matching pipeline.
///
/// Every field has a default so a user with no stored settings record
/// still gets a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Inclusive candidate age bounds. Only enforced when the candidate's
    /// age is known.
    #[serde(default)]
    pub min_age: Option<u8>,
    #[serde(default)]
    pub max_age: Option<u8>,

    /// Overrides the profile's `seeking` list for the outbound direction
    /// of the orientation check when set.
    #[serde(default)]
    pub preferred_genders: Option<Vec<GenderFilter>>,

    /// Minimum clamped score for ranked results.
    #[serde(default = "default_min_score")]
    pub min_score: f32,

    /// Matches served per calendar day.
    #[serde(default = "default_daily_quota")]
    pub daily_quota: u32,

    /// Distance budget in kilometres; `None` disables the locality filter.
    #[serde(default)]
    pub max_distance_km: Option<u32>,

    #[serde(default)]
    pub same_region_only: bool,
    #[serde(default)]
    pub same_language_only: bool,

    /// Category-weight override; `None` falls back to the taste profile's
    /// own weights.
    #[serde(default)]
    pub weights: Option<CategoryWeights>,

    /// Hard disqualifiers matched against a candidate's dominant traits.
    #[serde(default)]
    pub deal_breakers: Vec<String>,
}

fn default_min_score() -> f32 {
    DEFAULT_MIN_SCORE
}

fn default_daily_quota() -> u32 {
    DEFAULT_DAILY_QUOTA
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            min_age: None,
            max_age: None,
            preferred_genders: None,
            min_score: DEFAULT_MIN_SCORE,
            daily_quota: DEFAULT_DAILY_QUOTA,
            max_distance_km: None,
            same_region_only: false,
            same_language_only: false,
            weights: None,
            deal_breakers: Vec::new(),
        }
    }
}

impl MatchSettings {
    /// Normalizes inverted bounds and out-of-range knobs in place.
    ///
    /// Stored settings come from an external writer; the pipeline applies
    /// this once when loading rather than trusting the record.
    pub fn normalize(&mut self) {
        if let (Some(min), Some(max)) = (self.min_age, self.max_age)
            && min > max
        {
            std::mem::swap(&mut self.min_age, &mut self.max_age);
        }
        if !self.min_score.is_finite() || self.min_score < 0.0 {
            self.min_score = DEFAULT_MIN_SCORE;
        }
        if self.min_score > 1.0 {
            self.min_score = 1.0;
        }
    }

    /// Returns `true` if `age` falls inside the configured bounds.
    pub fn age_in_range(&self, age: u8) -> bool {
        if let Some(min) = self.min_age
            && age < min
        {
            return false;
        }
        if let Some(max) = self.max_age
            && age > max
        {
            return false;
        }
        true
    }
}
