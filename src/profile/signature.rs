//! Derived embedding record and taste signature.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emotional sub-profile derived by the embedding provider.
///
/// Fields are free-form provider vocabulary ("high", "calm", ...);
/// comparisons are exact, case-insensitive matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionalProfile {
    #[serde(default)]
    pub energy: Option<String>,
    #[serde(default)]
    pub intensity: Option<String>,
    #[serde(default)]
    pub social: Option<String>,
}

impl EmotionalProfile {
    /// Number of fields that match exactly (case-insensitive) between two
    /// profiles. Unset fields never match.
    pub fn matching_fields(&self, other: &EmotionalProfile) -> usize {
        [
            (&self.energy, &other.energy),
            (&self.intensity, &other.intensity),
            (&self.social, &other.social),
        ]
        .iter()
        .filter(|(a, b)| match (a, b) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        })
        .count()
    }
}

/// Qualitative traits derived alongside the embedding vector.
///
/// All sets may be empty; a missing signature degrades the corresponding
/// score boosts to zero rather than failing scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TasteSignature {
    #[serde(default)]
    pub dominant_traits: BTreeSet<String>,
    #[serde(default)]
    pub cultural_tags: BTreeSet<String>,
    #[serde(default)]
    pub thematic_tags: BTreeSet<String>,
    #[serde(default)]
    pub regional_tags: BTreeSet<String>,
    #[serde(default)]
    pub ideal_match_traits: BTreeSet<String>,
    #[serde(default)]
    pub emotional: Option<EmotionalProfile>,
}

/// A user's taste embedding plus its derived signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Identity of the profile this record belongs to. Must match the
    /// profile-record identity; mismatches exclude the candidate.
    pub profile_id: Uuid,
    /// Fixed-dimension taste vector. An empty vector means the record is
    /// treated as absent.
    pub vector: Vec<f32>,
    #[serde(default)]
    pub signature: Option<TasteSignature>,
    pub updated_at: DateTime<Utc>,
}

impl EmbeddingRecord {
    pub fn new(profile_id: Uuid, vector: Vec<f32>) -> Self {
        Self {
            profile_id,
            vector,
            signature: None,
            updated_at: Utc::now(),
        }
    }

    pub fn with_signature(mut self, signature: TasteSignature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Returns `true` if the record carries a usable vector.
    #[inline]
    pub fn has_vector(&self) -> bool {
        !self.vector.is_empty()
    }
}
