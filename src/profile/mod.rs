//! Core profile data model.
//!
//! Everything in this module is owned by the external profile store and
//! read-only to the matching core. Joins between the collections
//! (profiles, tastes, embeddings, settings) happen in memory and must
//! tolerate missing counterpart records.

mod settings;
mod signature;
mod taste;


pub use settings::{CategoryWeights, MatchSettings};
pub use signature::{EmbeddingRecord, EmotionalProfile, TasteSignature};
pub use taste::{TasteItem, TasteProfile};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's stated gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Woman,
    Man,
    NonBinary,
}

/// One entry of an accepted-gender list.
///
/// [`GenderFilter::Everyone`] is the inclusive sentinel: a list containing
/// it accepts all genders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderFilter {
    Woman,
    Man,
    NonBinary,
    Everyone,
}

impl GenderFilter {
    /// Returns `true` if this filter entry admits the given gender.
    #[inline]
    pub fn admits(&self, gender: Gender) -> bool {
        matches!(
            (self, gender),
            (GenderFilter::Everyone, _)
                | (GenderFilter::Woman, Gender::Woman)
                | (GenderFilter::Man, Gender::Man)
                | (GenderFilter::NonBinary, Gender::NonBinary)
        )
    }
}

/// Returns `true` if any entry of `filters` admits `gender`.
///
/// An empty list admits no one; callers that want "no preference" use the
/// [`GenderFilter::Everyone`] sentinel explicitly.
#[inline]
pub fn accepts_gender(filters: &[GenderFilter], gender: Gender) -> bool {
    filters.iter().any(|f| f.admits(gender))
}

/// City/region coordinates of a profile. Either field may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub region: Option<String>,
}

impl Location {
    pub fn new(city: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            region: Some(region.into()),
        }
    }

    /// Case-insensitive city equality; `false` when either side is unknown.
    pub fn same_city(&self, other: &Location) -> bool {
        match (&self.city, &other.city) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }

    /// Case-insensitive region equality; `false` when either side is unknown.
    pub fn same_region(&self, other: &Location) -> bool {
        match (&self.region, &other.region) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }
}

/// A user record as read from the profile store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: String,
    /// Unknown birth dates never exclude a candidate from age checks.
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    /// Who this user wants to be matched with.
    pub seeking: Vec<GenderFilter>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub language: Option<String>,
}

impl Profile {
    /// Age in whole years on the given date, if the birth date is known.
    pub fn age_on(&self, date: NaiveDate) -> Option<u8> {
        let birth = self.birth_date?;
        let mut age = date.years_since(birth)?;
        if age > u8::MAX as u32 {
            age = u8::MAX as u32;
        }
        Some(age as u8)
    }

    /// Returns `true` if this profile's seeking list admits `gender`.
    #[inline]
    pub fn seeks(&self, gender: Gender) -> bool {
        accepts_gender(&self.seeking, gender)
    }
}
