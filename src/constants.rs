//! Cross-cutting, shared constants.
//!
//! Score caps and thresholds live here so the scorer, ranker and backfill
//! agree on the same bands. Prefer deriving secondary values from primary
//! ones to avoid drift.
//!
//! # Dimension Invariants
//!
//! The embedding dimension is constant across all users of a deployment.
//! Use [`DimConfig`] to pass the dimension through initialization and
//! [`validate_embedding_dim`] at module boundaries to catch mismatches
//! early instead of silently comparing vectors of different lengths.

/// Default embedding vector dimension (number of floats).
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Raw scores below this floor are excluded outright by the ranker
/// instead of being clamped up to zero.
pub const RAW_SCORE_FLOOR: f32 = -0.2;

/// Default minimum clamped score a candidate needs to survive ranking.
/// Intentionally permissive.
pub const DEFAULT_MIN_SCORE: f32 = 0.05;

/// Default number of matches a user may be served per calendar day.
pub const DEFAULT_DAILY_QUOTA: u32 = 25;

/// Default floor under which the fallback pool is consulted.
pub const DEFAULT_MIN_RESULTS: usize = 5;

/// Default result-cache TTL in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Fixed score assigned to backfilled candidates. Below the organic band,
/// above [`DEFAULT_MIN_SCORE`].
pub const BACKFILL_BASELINE_SCORE: f32 = 0.10;

// Scorer boost schedule. Caps are sized so the raw maximum stays near 1.17
// with a cosine base of 1.0.

/// Minimum dominant-trait Jaccard similarity before the trait boost applies.
pub const TRAIT_OVERLAP_FLOOR: f32 = 0.25;
/// Weight applied to the dominant-trait Jaccard similarity.
pub const TRAIT_BOOST_WEIGHT: f32 = 0.04;

/// Increment per exactly-matching emotional-profile field.
pub const EMOTIONAL_FIELD_BOOST: f32 = 0.01;

pub const CULTURAL_BOOST_WEIGHT: f32 = 0.03;
pub const CULTURAL_BOOST_CAP: f32 = 0.015;
pub const THEMATIC_BOOST_WEIGHT: f32 = 0.03;
pub const THEMATIC_BOOST_CAP: f32 = 0.015;
pub const REGIONAL_BOOST_WEIGHT: f32 = 0.02;
pub const REGIONAL_BOOST_CAP: f32 = 0.01;

/// Increment for the first shared catalog id in a category.
pub const CATALOG_OVERLAP_BOOST: f32 = 0.005;
/// Additional increment once a category shares two or more ids.
pub const CATALOG_DEEP_OVERLAP_BOOST: f32 = 0.005;

/// Minimum genre-tag Jaccard similarity before the genre boost applies.
pub const GENRE_OVERLAP_FLOOR: f32 = 0.2;
/// Flat increment per category with genre-tag overlap above the floor.
pub const GENRE_OVERLAP_BOOST: f32 = 0.005;

/// Identity-compatibility scalar at or above this gets a bounded boost.
pub const IDENTITY_HIGH_THRESHOLD: f32 = 0.6;
/// Identity-compatibility scalar at or below this triggers the penalty.
pub const IDENTITY_LOW_THRESHOLD: f32 = 0.2;
pub const IDENTITY_BOOST_CAP: f32 = 0.015;
pub const IDENTITY_PENALTY_FACTOR: f32 = 0.85;

/// Multiplier applied once, after all additive boosts, when a pair shares
/// no catalog ids in any of the three categories.
pub const NO_CATALOG_OVERLAP_PENALTY: f32 = 0.75;

// Candidate-filter locality tiers (distance budget in kilometres).

/// Budgets at or under this require the same city.
pub const SAME_CITY_DISTANCE_KM: u32 = 25;
/// Budgets at or under this require the same city or the same region.
pub const SAME_REGION_DISTANCE_KM: u32 = 100;

// Proximity scorer bands (location mode, no embeddings).

pub const PROXIMITY_SAME_CITY: f32 = 0.85;
pub const PROXIMITY_SAME_REGION: f32 = 0.55;
pub const PROXIMITY_BASELINE: f32 = 0.25;

pub const AGE_ADJACENT_CLOSE_BONUS: f32 = 0.10;
pub const AGE_ADJACENT_NEAR_BONUS: f32 = 0.06;
pub const AGE_ADJACENT_FAR_BONUS: f32 = 0.03;

/// Runtime dimension configuration for modules that agree on vector sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimConfig {
    /// The embedding vector dimension (number of floats).
    pub embedding_dim: usize,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl DimConfig {
    /// Creates a new dimension configuration.
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    /// Validates that this configuration is usable.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        if self.embedding_dim == 0 {
            return Err(DimValidationError::ZeroDimension);
        }
        Ok(())
    }
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match the deployment dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected one.
///
/// Use this at module boundaries (provider responses, store writes) so a
/// mismatched vector is rejected before it reaches similarity math.
pub fn validate_embedding_dim(expected: usize, actual: usize) -> Result<(), DimValidationError> {
    if expected == 0 || actual == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if expected != actual {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
