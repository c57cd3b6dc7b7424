//! Embedding-based compatibility scoring (preferences mode).

use std::collections::BTreeSet;

use tracing::debug;

use crate::constants::{
    self, CATALOG_DEEP_OVERLAP_BOOST, CATALOG_OVERLAP_BOOST, CULTURAL_BOOST_CAP,
    CULTURAL_BOOST_WEIGHT, DimConfig, EMOTIONAL_FIELD_BOOST, GENRE_OVERLAP_BOOST,
    GENRE_OVERLAP_FLOOR, IDENTITY_BOOST_CAP, IDENTITY_HIGH_THRESHOLD, IDENTITY_LOW_THRESHOLD,
    IDENTITY_PENALTY_FACTOR, NO_CATALOG_OVERLAP_PENALTY, REGIONAL_BOOST_CAP,
    REGIONAL_BOOST_WEIGHT, THEMATIC_BOOST_CAP, THEMATIC_BOOST_WEIGHT, TRAIT_BOOST_WEIGHT,
    TRAIT_OVERLAP_FLOOR,
};
use crate::profile::{
    CategoryWeights, EmbeddingRecord, Profile, TasteItem, TasteProfile, TasteSignature,
};

use super::error::{ScoringError, ScoringResult};
use super::types::ScoreBreakdown;

/// Everything the scorer needs about one side of a pair.
///
/// The taste catalog is optional; a side without one simply earns no
/// catalog or genre boosts.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub profile: &'a Profile,
    pub taste: Option<&'a TasteProfile>,
    pub embedding: &'a EmbeddingRecord,
}

impl<'a> MatchContext<'a> {
    pub fn new(
        profile: &'a Profile,
        taste: Option<&'a TasteProfile>,
        embedding: &'a EmbeddingRecord,
    ) -> Self {
        Self {
            profile,
            taste,
            embedding,
        }
    }

    fn signature(&self) -> Option<&'a TasteSignature> {
        self.embedding.signature.as_ref()
    }
}

/// Computes a bounded compatibility score for a user/candidate pair.
///
/// The base is cosine similarity of the embedding vectors; a schedule of
/// independently gated, capped boosts and two multiplicative penalties is
/// layered on top. Missing sub-profiles degrade their boosts to zero
/// rather than erroring.
#[derive(Debug, Clone)]
pub struct CompatibilityScorer {
    dims: DimConfig,
}

impl CompatibilityScorer {
    pub fn new(dims: DimConfig) -> Self {
        Self { dims }
    }

    pub fn dims(&self) -> DimConfig {
        self.dims
    }

    /// Scores `candidate` against `user`.
    ///
    /// Returns an error only for contract violations (missing or
    /// wrong-dimension vectors); the engine drops such candidates without
    /// aborting the run.
    pub fn score(
        &self,
        user: &MatchContext<'_>,
        candidate: &MatchContext<'_>,
        weights: CategoryWeights,
    ) -> ScoringResult<ScoreBreakdown> {
        for ctx in [user, candidate] {
            if !ctx.embedding.has_vector() {
                return Err(ScoringError::MissingVector {
                    candidate_id: ctx.profile.id,
                });
            }
            constants::validate_embedding_dim(self.dims.embedding_dim, ctx.embedding.vector.len())?;
        }

        let base = cosine_similarity(&user.embedding.vector, &candidate.embedding.vector);

        let mut boosts = 0.0f32;
        let mut penalty_factor = 1.0f32;
        let mut rationale = Vec::new();

        if let (Some(us), Some(cs)) = (user.signature(), candidate.signature()) {
            let trait_overlap = jaccard(&us.dominant_traits, &cs.dominant_traits);
            if trait_overlap >= TRAIT_OVERLAP_FLOOR {
                boosts += TRAIT_BOOST_WEIGHT * trait_overlap;
                rationale.push("shared dominant traits".to_string());
            }

            if let (Some(ue), Some(ce)) = (us.emotional.as_ref(), cs.emotional.as_ref()) {
                let matches = ue.matching_fields(ce);
                if matches > 0 {
                    boosts += EMOTIONAL_FIELD_BOOST * matches as f32;
                    rationale.push("similar emotional profile".to_string());
                }
            }

            for (label, a, b, weight, cap) in [
                (
                    "shared cultural tags",
                    &us.cultural_tags,
                    &cs.cultural_tags,
                    CULTURAL_BOOST_WEIGHT,
                    CULTURAL_BOOST_CAP,
                ),
                (
                    "overlapping themes",
                    &us.thematic_tags,
                    &cs.thematic_tags,
                    THEMATIC_BOOST_WEIGHT,
                    THEMATIC_BOOST_CAP,
                ),
                (
                    "regional affinity",
                    &us.regional_tags,
                    &cs.regional_tags,
                    REGIONAL_BOOST_WEIGHT,
                    REGIONAL_BOOST_CAP,
                ),
            ] {
                let overlap = jaccard(a, b);
                if overlap > 0.0 {
                    boosts += (weight * overlap).min(cap);
                    rationale.push(label.to_string());
                }
            }
        }

        let mut any_catalog_overlap = false;
        let mut catalogs_comparable = false;
        if let (Some(ut), Some(ct)) = (user.taste, candidate.taste) {
            catalogs_comparable = !ut.is_empty() && !ct.is_empty();
            for (id_label, genre_label, a, b, weight) in [
                (
                    "shared movies",
                    "overlapping movie genres",
                    &ut.movies,
                    &ct.movies,
                    weights.movies,
                ),
                (
                    "shared music",
                    "overlapping music genres",
                    &ut.music,
                    &ct.music,
                    weights.music,
                ),
                (
                    "shared shows",
                    "overlapping show genres",
                    &ut.shows,
                    &ct.shows,
                    weights.shows,
                ),
            ] {
                let weight = weight.clamp(0.0, 1.5);

                let shared = shared_id_count(a, b);
                if shared >= 1 {
                    any_catalog_overlap = true;
                    let mut boost = CATALOG_OVERLAP_BOOST;
                    if shared >= 2 {
                        boost += CATALOG_DEEP_OVERLAP_BOOST;
                    }
                    boosts += boost * weight;
                    rationale.push(id_label.to_string());
                }

                // Genre-level overlap is independent of exact-id overlap.
                let genre_overlap = jaccard(&genre_set(a), &genre_set(b));
                if genre_overlap >= GENRE_OVERLAP_FLOOR {
                    boosts += GENRE_OVERLAP_BOOST * weight;
                    rationale.push(genre_label.to_string());
                }
            }
        }

        match identity_compatibility(user.signature(), candidate.signature()) {
            Some(score) if score >= IDENTITY_HIGH_THRESHOLD => {
                boosts += (IDENTITY_BOOST_CAP * score).min(IDENTITY_BOOST_CAP);
                rationale.push("seeking alignment".to_string());
            }
            Some(score) if score <= IDENTITY_LOW_THRESHOLD => {
                penalty_factor *= IDENTITY_PENALTY_FACTOR;
                rationale.push("weak seeking alignment".to_string());
            }
            _ => {}
        }

        // Applied once, after all additive boosts, not per category. Absent
        // catalogs degrade to no penalty rather than an implicit one.
        if catalogs_comparable && !any_catalog_overlap {
            penalty_factor *= NO_CATALOG_OVERLAP_PENALTY;
            rationale.push("no shared catalog items".to_string());
        }

        let mut breakdown = ScoreBreakdown::from_parts(base, boosts, penalty_factor);
        breakdown.rationale = rationale;

        debug!(
            user = %user.profile.id,
            candidate = %candidate.profile.id,
            base = breakdown.base,
            boosts = breakdown.boosts,
            penalty_factor = breakdown.penalty_factor,
            raw = breakdown.raw,
            "Scored candidate"
        );

        Ok(breakdown)
    }
}

impl Default for CompatibilityScorer {
    fn default() -> Self {
        Self::new(DimConfig::default())
    }
}

/// Cosine similarity of two f32 vectors.
///
/// Returns 0.0 on length mismatch, empty input or zero magnitude.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Jaccard similarity of two string sets. Empty-vs-anything is 0.0.
#[inline]
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f32 / union as f32
}

/// The identity-compatibility scalar for a pair: the symmetric mean of how
/// well each side's ideal-match traits cover the other side's dominant
/// traits. `None` when neither side has enough signal.
pub fn identity_compatibility(
    a: Option<&TasteSignature>,
    b: Option<&TasteSignature>,
) -> Option<f32> {
    let (a, b) = (a?, b?);

    let forward = directional_overlap(&a.ideal_match_traits, &b.dominant_traits)?;
    let backward = directional_overlap(&b.ideal_match_traits, &a.dominant_traits)?;

    Some((forward + backward) / 2.0)
}

fn directional_overlap(ideal: &BTreeSet<String>, dominant: &BTreeSet<String>) -> Option<f32> {
    if ideal.is_empty() || dominant.is_empty() {
        return None;
    }
    Some(ideal.intersection(dominant).count() as f32 / ideal.len() as f32)
}

fn shared_id_count(a: &[TasteItem], b: &[TasteItem]) -> usize {
    let ids: BTreeSet<&str> = a.iter().map(|item| item.id.as_str()).collect();
    b.iter()
        .map(|item| item.id.as_str())
        .collect::<BTreeSet<_>>()
        .intersection(&ids)
        .count()
}

fn genre_set(items: &[TasteItem]) -> BTreeSet<String> {
    items
        .iter()
        .flat_map(|item| item.genres.iter())
        .map(|g| g.to_lowercase())
        .collect()
}
