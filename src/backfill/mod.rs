//! Fallback backfill: guarantees a non-empty result set.
//!
//! New users with sparse history (or no embedding at all) would otherwise
//! see empty lists. The pool is configuration, supplied at startup, never
//! identities baked into logic.


use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::constants::BACKFILL_BASELINE_SCORE;
use crate::filter;
use crate::profile::{MatchSettings, Profile};
use crate::ranking::{MatchOrigin, RankedMatch, sort_entries};

/// Ordered fallback candidate pool.
///
/// `featured` is the optional always-first promoted profile; `seeds` are
/// always-available profiles walked in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackPool {
    #[serde(default)]
    pub featured: Option<Uuid>,
    #[serde(default)]
    pub seeds: Vec<Uuid>,
}

impl FallbackPool {
    pub fn new(featured: Option<Uuid>, seeds: Vec<Uuid>) -> Self {
        Self { featured, seeds }
    }

    pub fn is_empty(&self) -> bool {
        self.featured.is_none() && self.seeds.is_empty()
    }

    /// All pool ids in priority order, featured first.
    pub fn ordered_ids(&self) -> Vec<Uuid> {
        let mut ids = Vec::with_capacity(self.seeds.len() + 1);
        if let Some(featured) = self.featured {
            ids.push(featured);
        }
        for seed in &self.seeds {
            if Some(*seed) != self.featured {
                ids.push(*seed);
            }
        }
        ids
    }
}

/// Tops up a ranked list from resolved fallback profiles.
///
/// `candidates` must already be in pool priority order. Entries are
/// appended with the fixed baseline score, skipping anything already
/// present, excluded by the ledger, or failing the hard age/orientation
/// rules. Afterwards the list is re-sorted and an eligible featured
/// profile is pinned first regardless of numeric score.
#[allow(clippy::too_many_arguments)]
pub fn backfill(
    ranked: Vec<RankedMatch>,
    min_count: usize,
    candidates: &[Profile],
    featured: Option<Uuid>,
    user: &Profile,
    settings: &MatchSettings,
    exclusion: &HashSet<Uuid>,
    today: NaiveDate,
) -> Vec<RankedMatch> {
    let mut entries = ranked;
    let mut present: HashSet<Uuid> = entries.iter().map(|m| m.candidate_id).collect();
    let organic_count = entries.len();

    for candidate in candidates {
        if entries.len() >= min_count {
            break;
        }
        if candidate.id == user.id
            || present.contains(&candidate.id)
            || exclusion.contains(&candidate.id)
        {
            continue;
        }
        if !filter::age_acceptable(candidate, settings, today)
            || !filter::orientation_compatible(user, candidate, settings)
        {
            continue;
        }

        let origin = if Some(candidate.id) == featured {
            MatchOrigin::Featured
        } else {
            MatchOrigin::Fallback
        };

        present.insert(candidate.id);
        entries.push(RankedMatch {
            candidate_id: candidate.id,
            display_name: candidate.display_name.clone(),
            age: candidate.age_on(today),
            city: candidate.location.city.clone(),
            region: candidate.location.region.clone(),
            score: BACKFILL_BASELINE_SCORE,
            rationale: vec!["suggested for you".to_string()],
            origin,
        });
    }

    if entries.len() > organic_count {
        debug!(
            organic = organic_count,
            backfilled = entries.len() - organic_count,
            "Backfilled ranked list"
        );
    }

    sort_entries(&mut entries);

    if let Some(featured) = featured
        && let Some(pos) = entries.iter().position(|m| m.candidate_id == featured)
        && pos > 0
    {
        let entry = entries.remove(pos);
        entries.insert(0, entry);
    }

    entries
}
