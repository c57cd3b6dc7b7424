//! Score breakdowns and scored-candidate carriers.

use serde::{Deserialize, Serialize};

use crate::profile::Profile;

/// Which scoring pipeline a match request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Full embedding pipeline with taste boosts.
    Preferences,
    /// Locality-only scoring; works without embeddings.
    Location,
}

impl MatchMode {
    /// All modes, for cache invalidation sweeps.
    pub const ALL: [MatchMode; 2] = [MatchMode::Preferences, MatchMode::Location];
}

/// How a candidate's score was assembled.
///
/// `raw` is the pre-clamp value; the ranker owns clamping and the
/// negative-floor exclusion.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    /// Cosine base (preferences mode) or locality base (location mode).
    pub base: f32,
    /// Sum of all additive boosts.
    pub boosts: f32,
    /// Product of the multiplicative penalties (1.0 when none applied).
    pub penalty_factor: f32,
    /// Final raw score: `(base + boosts) * penalty_factor`.
    pub raw: f32,
    /// Human-readable labels for each contribution, in application order.
    pub rationale: Vec<String>,
}

impl ScoreBreakdown {
    pub(crate) fn from_parts(base: f32, boosts: f32, penalty_factor: f32) -> Self {
        Self {
            base,
            boosts,
            penalty_factor,
            raw: (base + boosts) * penalty_factor,
            rationale: Vec::new(),
        }
    }

    /// The raw score clamped into `[0, 1]`.
    #[inline]
    pub fn clamped(&self) -> f32 {
        self.raw.clamp(0.0, 1.0)
    }
}

/// A candidate that survived filtering, with its score attached.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub profile: Profile,
    pub breakdown: ScoreBreakdown,
}

impl ScoredCandidate {
    pub fn new(profile: Profile, breakdown: ScoreBreakdown) -> Self {
        Self { profile, breakdown }
    }
}
