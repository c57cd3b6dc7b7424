//! Ranking, deduplication and quota truncation.
//!
//! This is the single place where scores are clamped, ordered and
//! deduplicated. Upstream stages are not trusted to have deduplicated:
//! concurrent writes to the profile/embedding store can surface transient
//! duplicates, so the dedup step here is defensive and idempotent.


use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::RAW_SCORE_FLOOR;
use crate::profile::MatchSettings;
use crate::scoring::ScoredCandidate;

/// Where a ranked entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOrigin {
    /// Scored by the live pipeline.
    Organic,
    /// Appended from the fallback pool.
    Fallback,
    /// The promoted always-first profile.
    Featured,
}

/// One entry of a ranked result list. Ephemeral; the interaction ledger,
/// not this list, is the source of truth for what has been seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub candidate_id: Uuid,
    pub display_name: String,
    pub age: Option<u8>,
    pub city: Option<String>,
    pub region: Option<String>,
    /// Clamped to `[0, 1]`.
    pub score: f32,
    pub rationale: Vec<String>,
    pub origin: MatchOrigin,
}

impl RankedMatch {
    /// Builds an entry from a scored candidate, computing the age on the
    /// given date and clamping the score.
    pub fn from_scored(scored: &ScoredCandidate, origin: MatchOrigin, today: NaiveDate) -> Self {
        Self {
            candidate_id: scored.profile.id,
            display_name: scored.profile.display_name.clone(),
            age: scored.profile.age_on(today),
            city: scored.profile.location.city.clone(),
            region: scored.profile.location.region.clone(),
            score: scored.breakdown.clamped(),
            rationale: scored.breakdown.rationale.clone(),
            origin,
        }
    }
}

/// Knobs for one ranking pass.
#[derive(Debug, Clone, Copy)]
pub struct RankOptions {
    /// Minimum clamped score to survive.
    pub min_score: f32,
    /// Hard cap on the output length; `None` leaves the list untruncated
    /// (the engine applies the live daily quota at serve time instead).
    pub limit: Option<usize>,
}

impl From<&MatchSettings> for RankOptions {
    fn from(settings: &MatchSettings) -> Self {
        Self {
            min_score: settings.min_score,
            limit: None,
        }
    }
}

/// Sorts, deduplicates and limits a scored candidate set.
///
/// Raw scores below [`RAW_SCORE_FLOOR`] are excluded outright; the rest
/// are clamped to `[0, 1]`, filtered by `min_score`, sorted descending
/// with candidate id as the stable tie-break, and deduplicated keeping the
/// higher-scored occurrence per identity.
pub fn rank(scored: Vec<ScoredCandidate>, opts: &RankOptions) -> Vec<RankedMatch> {
    let today = Utc::now().date_naive();
    rank_on(scored, opts, today)
}

/// [`rank`] with an explicit date for age display (deterministic in tests).
pub fn rank_on(
    scored: Vec<ScoredCandidate>,
    opts: &RankOptions,
    today: NaiveDate,
) -> Vec<RankedMatch> {
    let mut entries: Vec<RankedMatch> = scored
        .iter()
        .filter(|c| c.breakdown.raw >= RAW_SCORE_FLOOR)
        .map(|c| RankedMatch::from_scored(c, MatchOrigin::Organic, today))
        .filter(|m| m.score >= opts.min_score)
        .collect();

    sort_entries(&mut entries);

    // Sorted descending, so keeping the first occurrence keeps the
    // higher-scored one.
    let mut seen = HashSet::with_capacity(entries.len());
    entries.retain(|m| seen.insert(m.candidate_id));

    if let Some(limit) = opts.limit {
        entries.truncate(limit);
    }

    entries
}

/// Descending by score, candidate id ascending as the tie-break, so the
/// output is deterministic for identical inputs.
pub(crate) fn sort_entries(entries: &mut [RankedMatch]) {
    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });
}
