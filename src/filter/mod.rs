//! Hard eligibility rules applied before any scoring.
//!
//! Rules run cheapest and most exclusionary first. Filtering is pure: it
//! reads profiles and a precomputed exclusion set, and never touches the
//! ledger. Unknown data (age, location) never excludes on its own.


use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::constants::{SAME_CITY_DISTANCE_KM, SAME_REGION_DISTANCE_KM};
use crate::profile::{Gender, GenderFilter, MatchSettings, Profile, accepts_gender};

/// Applies the hard eligibility rules to a candidate pool.
///
/// Output order is not guaranteed.
pub fn eligible(
    pool: Vec<Profile>,
    user: &Profile,
    settings: &MatchSettings,
    exclusion: &HashSet<Uuid>,
) -> Vec<Profile> {
    let today = Utc::now().date_naive();
    pool.into_iter()
        .filter(|candidate| is_eligible(candidate, user, settings, exclusion, today))
        .collect()
}

fn is_eligible(
    candidate: &Profile,
    user: &Profile,
    settings: &MatchSettings,
    exclusion: &HashSet<Uuid>,
    today: NaiveDate,
) -> bool {
    if candidate.id == user.id || exclusion.contains(&candidate.id) {
        return false;
    }
    if !age_acceptable(candidate, settings, today) {
        return false;
    }
    if !orientation_compatible(user, candidate, settings) {
        return false;
    }
    if settings.same_region_only && !user.location.same_region(&candidate.location) {
        return false;
    }
    if settings.same_language_only && !same_language(user, candidate) {
        return false;
    }
    within_distance_budget(user, candidate, settings.max_distance_km)
}

/// Age check against the user's configured bounds.
///
/// Only enforced when the candidate's age is known; an unknown age never
/// excludes.
pub fn age_acceptable(candidate: &Profile, settings: &MatchSettings, today: NaiveDate) -> bool {
    match candidate.age_on(today) {
        Some(age) => settings.age_in_range(age),
        None => true,
    }
}

/// Mutual orientation check.
///
/// The outbound direction uses the settings override when present,
/// otherwise the user's profile `seeking` list. The inbound direction is
/// always the candidate's own list. Failure of either direction excludes.
pub fn orientation_compatible(
    user: &Profile,
    candidate: &Profile,
    settings: &MatchSettings,
) -> bool {
    let outbound: &[GenderFilter] = settings
        .preferred_genders
        .as_deref()
        .unwrap_or(&user.seeking);

    accepts_gender(outbound, candidate.gender) && wants(candidate, user.gender)
}

#[inline]
fn wants(profile: &Profile, gender: Gender) -> bool {
    profile.seeks(gender)
}

fn same_language(user: &Profile, candidate: &Profile) -> bool {
    match (&user.language, &candidate.language) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        // Unknown on either side never excludes.
        _ => true,
    }
}

/// Tiered locality policy.
///
/// A small distance budget requires the same city, a medium one the same
/// city or region, and a large (or absent) one applies no locality filter
/// at all. Missing location data on either side never excludes.
pub fn within_distance_budget(
    user: &Profile,
    candidate: &Profile,
    max_distance_km: Option<u32>,
) -> bool {
    let Some(budget) = max_distance_km else {
        return true;
    };

    let cities_known = user.location.city.is_some() && candidate.location.city.is_some();
    let regions_known = user.location.region.is_some() && candidate.location.region.is_some();

    if budget <= SAME_CITY_DISTANCE_KM {
        !cities_known || user.location.same_city(&candidate.location)
    } else if budget <= SAME_REGION_DISTANCE_KM {
        if cities_known && user.location.same_city(&candidate.location) {
            true
        } else {
            !regions_known || user.location.same_region(&candidate.location)
        }
    } else {
        true
    }
}
