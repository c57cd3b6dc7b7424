use super::*;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::constants::{
    DimConfig, IDENTITY_PENALTY_FACTOR, NO_CATALOG_OVERLAP_PENALTY, PROXIMITY_BASELINE,
    PROXIMITY_SAME_CITY, PROXIMITY_SAME_REGION,
};
use crate::profile::{
    CategoryWeights, EmbeddingRecord, EmotionalProfile, Gender, GenderFilter, Location, Profile,
    TasteItem, TasteProfile, TasteSignature,
};

const DIM: usize = 4;

fn profile() -> Profile {
    Profile {
        id: Uuid::new_v4(),
        display_name: "test".into(),
        birth_date: None,
        gender: Gender::Woman,
        seeking: vec![GenderFilter::Everyone],
        location: Location::default(),
        language: None,
    }
}

fn record(profile: &Profile, vector: Vec<f32>) -> EmbeddingRecord {
    EmbeddingRecord::new(profile.id, vector)
}

fn traits(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn scorer() -> CompatibilityScorer {
    CompatibilityScorer::new(DimConfig::new(DIM))
}

fn score_pair(
    user: (&Profile, Option<&TasteProfile>, &EmbeddingRecord),
    cand: (&Profile, Option<&TasteProfile>, &EmbeddingRecord),
) -> ScoreBreakdown {
    scorer()
        .score(
            &MatchContext::new(user.0, user.1, user.2),
            &MatchContext::new(cand.0, cand.1, cand.2),
            CategoryWeights::default(),
        )
        .unwrap()
}

mod cosine_tests {
    use super::*;

    #[test]
    fn test_identical_vectors_score_one() {
        let v = vec![0.5, -0.25, 0.75, 0.1];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors_score_negative_one() {
        let a = vec![1.0, 0.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        let a = vec![1.0, 0.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_zero_magnitude_yields_zero() {
        let a = vec![0.0; 4];
        let b = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_length_mismatch_yields_zero() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
    }
}

mod jaccard_tests {
    use super::*;

    #[test]
    fn test_disjoint_sets() {
        assert_eq!(jaccard(&traits(&["a"]), &traits(&["b"])), 0.0);
    }

    #[test]
    fn test_identical_sets() {
        let s = traits(&["a", "b"]);
        assert_eq!(jaccard(&s, &s), 1.0);
    }

    #[test]
    fn test_partial_overlap() {
        let a = traits(&["a", "b", "c"]);
        let b = traits(&["b", "c", "d"]);
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_empty_set_is_zero() {
        assert_eq!(jaccard(&BTreeSet::new(), &traits(&["a"])), 0.0);
    }
}

mod scorer_tests {
    use super::*;

    #[test]
    fn test_identical_vectors_no_taste_base_is_one() {
        let (u, c) = (profile(), profile());
        let v = vec![0.1, 0.2, 0.3, 0.4];
        let (ue, ce) = (record(&u, v.clone()), record(&c, v));

        let breakdown = score_pair((&u, None, &ue), (&c, None, &ce));
        assert!((breakdown.base - 1.0).abs() < 1e-6);
        // Absent catalogs degrade to no penalty, not an implicit one.
        assert_eq!(breakdown.penalty_factor, 1.0);
    }

    #[test]
    fn test_missing_signature_degrades_boosts_to_zero() {
        let (u, c) = (profile(), profile());
        let v = vec![1.0, 0.0, 0.0, 0.0];
        let (ue, ce) = (record(&u, v.clone()), record(&c, v));

        let breakdown = score_pair((&u, None, &ue), (&c, None, &ce));
        assert_eq!(breakdown.boosts, 0.0);
    }

    #[test]
    fn test_trait_overlap_below_floor_is_gated() {
        let (u, c) = (profile(), profile());
        let v = vec![1.0, 0.0, 0.0, 0.0];

        // Jaccard of 1/6 < 0.25 floor.
        let ue = record(&u, v.clone()).with_signature(TasteSignature {
            dominant_traits: traits(&["a", "b", "c", "d"]),
            ..Default::default()
        });
        let ce = record(&c, v).with_signature(TasteSignature {
            dominant_traits: traits(&["a", "x", "y"]),
            ..Default::default()
        });

        let breakdown = score_pair((&u, None, &ue), (&c, None, &ce));
        assert_eq!(breakdown.boosts, 0.0);
    }

    #[test]
    fn test_trait_overlap_above_floor_boosts() {
        let (u, c) = (profile(), profile());
        let v = vec![1.0, 0.0, 0.0, 0.0];

        let sig = TasteSignature {
            dominant_traits: traits(&["warm", "curious"]),
            ..Default::default()
        };
        let ue = record(&u, v.clone()).with_signature(sig.clone());
        let ce = record(&c, v).with_signature(sig);

        let breakdown = score_pair((&u, None, &ue), (&c, None, &ce));
        assert!(breakdown.boosts > 0.0);
        assert!(
            breakdown
                .rationale
                .iter()
                .any(|r| r == "shared dominant traits")
        );
    }

    #[test]
    fn test_emotional_fields_boost_per_match() {
        let (u, c) = (profile(), profile());
        let v = vec![1.0, 0.0, 0.0, 0.0];

        let emotional = EmotionalProfile {
            energy: Some("high".into()),
            intensity: Some("calm".into()),
            social: Some("ambivert".into()),
        };
        let sig = TasteSignature {
            emotional: Some(emotional),
            ..Default::default()
        };
        let ue = record(&u, v.clone()).with_signature(sig.clone());
        let ce = record(&c, v).with_signature(sig);

        let breakdown = score_pair((&u, None, &ue), (&c, None, &ce));
        assert!((breakdown.boosts - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_catalog_overlap_tiers() {
        let (u, c) = (profile(), profile());
        let v = vec![1.0, 0.0, 0.0, 0.0];
        let (ue, ce) = (record(&u, v.clone()), record(&c, v));

        let mut ut = TasteProfile::empty(u.id);
        let mut ct = TasteProfile::empty(c.id);
        ut.movies = vec![TasteItem::new("m1", "One"), TasteItem::new("m2", "Two")];
        ct.movies = vec![TasteItem::new("m1", "One"), TasteItem::new("m2", "Two")];

        let breakdown = score_pair((&u, Some(&ut), &ue), (&c, Some(&ct), &ce));
        // First + deep overlap increments, no penalty.
        assert!((breakdown.boosts - 0.01).abs() < 1e-6);
        assert_eq!(breakdown.penalty_factor, 1.0);
    }

    #[test]
    fn test_genre_overlap_is_independent_of_id_overlap() {
        let (u, c) = (profile(), profile());
        let v = vec![1.0, 0.0, 0.0, 0.0];
        let (ue, ce) = (record(&u, v.clone()), record(&c, v));

        let mut ut = TasteProfile::empty(u.id);
        let mut ct = TasteProfile::empty(c.id);
        // Different ids, same genres.
        ut.movies = vec![TasteItem::new("m1", "One").with_genres(["noir"])];
        ct.movies = vec![TasteItem::new("m2", "Two").with_genres(["noir"])];

        let breakdown = score_pair((&u, Some(&ut), &ue), (&c, Some(&ct), &ce));
        assert!(breakdown.rationale.iter().any(|r| r.contains("genres")));
        // No shared ids anywhere, so the catalog penalty still applies.
        assert_eq!(breakdown.penalty_factor, NO_CATALOG_OVERLAP_PENALTY);
    }

    #[test]
    fn test_zero_catalog_penalty_applied_once() {
        let (u, c) = (profile(), profile());
        let v = vec![1.0, 0.0, 0.0, 0.0];
        let (ue, ce) = (record(&u, v.clone()), record(&c, v));

        // Three populated categories, zero overlap in each: the penalty
        // must not compound per category.
        let mut ut = TasteProfile::empty(u.id);
        let mut ct = TasteProfile::empty(c.id);
        ut.movies = vec![TasteItem::new("m1", "One")];
        ut.music = vec![TasteItem::new("a1", "Artist")];
        ut.shows = vec![TasteItem::new("s1", "Show")];
        ct.movies = vec![TasteItem::new("m2", "Two")];
        ct.music = vec![TasteItem::new("a2", "Other")];
        ct.shows = vec![TasteItem::new("s2", "Else")];

        let breakdown = score_pair((&u, Some(&ut), &ue), (&c, Some(&ct), &ce));
        assert_eq!(breakdown.penalty_factor, NO_CATALOG_OVERLAP_PENALTY);
    }

    #[test]
    fn test_identity_alignment_boost_and_penalty() {
        let (u, c) = (profile(), profile());
        let v = vec![1.0, 0.0, 0.0, 0.0];

        let aligned_user = TasteSignature {
            ideal_match_traits: traits(&["warm"]),
            dominant_traits: traits(&["bold"]),
            ..Default::default()
        };
        let aligned_cand = TasteSignature {
            ideal_match_traits: traits(&["bold"]),
            dominant_traits: traits(&["warm"]),
            ..Default::default()
        };
        let ue = record(&u, v.clone()).with_signature(aligned_user);
        let ce = record(&c, v.clone()).with_signature(aligned_cand);
        let aligned = score_pair((&u, None, &ue), (&c, None, &ce));
        assert!(aligned.rationale.iter().any(|r| r == "seeking alignment"));

        let misaligned_user = TasteSignature {
            ideal_match_traits: traits(&["quiet"]),
            dominant_traits: traits(&["bold"]),
            ..Default::default()
        };
        let misaligned_cand = TasteSignature {
            ideal_match_traits: traits(&["wild"]),
            dominant_traits: traits(&["warm"]),
            ..Default::default()
        };
        let ue = record(&u, v.clone()).with_signature(misaligned_user);
        let ce = record(&c, v).with_signature(misaligned_cand);
        let misaligned = score_pair((&u, None, &ue), (&c, None, &ce));
        assert!((misaligned.penalty_factor - IDENTITY_PENALTY_FACTOR).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let (u, c) = (profile(), profile());
        let ue = record(&u, vec![1.0, 0.0, 0.0, 0.0]);
        let ce = record(&c, vec![1.0, 0.0]);

        let result = scorer().score(
            &MatchContext::new(&u, None, &ue),
            &MatchContext::new(&c, None, &ce),
            CategoryWeights::default(),
        );
        assert!(matches!(result, Err(ScoringError::Dimension(_))));
    }

    #[test]
    fn test_empty_vector_is_an_error() {
        let (u, c) = (profile(), profile());
        let ue = record(&u, vec![1.0, 0.0, 0.0, 0.0]);
        let ce = record(&c, vec![]);

        let result = scorer().score(
            &MatchContext::new(&u, None, &ue),
            &MatchContext::new(&c, None, &ce),
            CategoryWeights::default(),
        );
        assert!(matches!(result, Err(ScoringError::MissingVector { .. })));
    }

    #[test]
    fn test_clamped_score_is_bounded() {
        let (u, c) = (profile(), profile());
        let v = vec![0.3, 0.3, 0.3, 0.3];
        let sig = TasteSignature {
            dominant_traits: traits(&["a", "b"]),
            cultural_tags: traits(&["x"]),
            thematic_tags: traits(&["y"]),
            regional_tags: traits(&["z"]),
            ideal_match_traits: traits(&["a"]),
            emotional: Some(EmotionalProfile {
                energy: Some("high".into()),
                intensity: Some("calm".into()),
                social: Some("ambivert".into()),
            }),
        };
        let ue = record(&u, v.clone()).with_signature(sig.clone());
        let ce = record(&c, v).with_signature(sig);

        let mut ut = TasteProfile::empty(u.id);
        let mut ct = TasteProfile::empty(c.id);
        ut.movies = vec![TasteItem::new("m1", "One").with_genres(["noir"])];
        ct.movies = ut.movies.clone();

        let breakdown = score_pair((&u, Some(&ut), &ue), (&c, Some(&ct), &ce));
        assert!(breakdown.raw > 1.0, "boosts should push past 1.0");
        let clamped = breakdown.clamped();
        assert!((0.0..=1.0).contains(&clamped));
        assert_eq!(clamped, 1.0);
    }
}

mod proximity_tests {
    use super::*;

    fn located(city: &str, region: &str, birth_year: i32) -> Profile {
        let mut p = profile();
        p.location = Location::new(city, region);
        p.birth_date = NaiveDate::from_ymd_opt(birth_year, 1, 1);
        p
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    #[test]
    fn test_same_city_band() {
        let user = located("Lisbon", "PT", 1994);
        let cand = located("Lisbon", "PT", 1995);
        let breakdown = ProximityScorer::new().score_on(&user, &cand, today());
        assert_eq!(breakdown.base, PROXIMITY_SAME_CITY);
        assert!(breakdown.boosts > 0.0);
    }

    #[test]
    fn test_same_region_band() {
        let user = located("Lisbon", "PT", 1994);
        let cand = located("Porto", "PT", 1994);
        let breakdown = ProximityScorer::new().score_on(&user, &cand, today());
        assert_eq!(breakdown.base, PROXIMITY_SAME_REGION);
    }

    #[test]
    fn test_elsewhere_band() {
        let user = located("Lisbon", "PT", 1994);
        let cand = located("Madrid", "ES", 1970);
        let breakdown = ProximityScorer::new().score_on(&user, &cand, today());
        assert_eq!(breakdown.base, PROXIMITY_BASELINE);
        assert_eq!(breakdown.boosts, 0.0);
    }

    #[test]
    fn test_missing_ages_earn_no_bonus() {
        let mut user = located("Lisbon", "PT", 1994);
        user.birth_date = None;
        let cand = located("Lisbon", "PT", 1994);
        let breakdown = ProximityScorer::new().score_on(&user, &cand, today());
        assert_eq!(breakdown.boosts, 0.0);
    }

    #[test]
    fn test_proximity_score_bounded() {
        let user = located("Lisbon", "PT", 1994);
        let cand = located("Lisbon", "PT", 1994);
        let breakdown = ProximityScorer::new().score_on(&user, &cand, today());
        assert!(breakdown.raw <= 1.0);
    }
}
