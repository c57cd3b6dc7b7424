//! Shared builders for integration tests.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use uuid::Uuid;

use kindred::{
    DimConfig, EmbeddingRecord, EngineConfig, Gender, GenderFilter, Location, MatchEngine,
    MemoryProfileStore, Profile, StubEmbeddingProvider, TasteItem, TasteProfile,
};

/// Small dimension so fixture vectors stay readable.
pub const TEST_DIM: usize = 8;

/// Installs a test subscriber once; safe to call from every test.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub type TestEngine = MatchEngine<MemoryProfileStore, StubEmbeddingProvider>;

pub fn test_config() -> EngineConfig {
    EngineConfig {
        dims: DimConfig::new(TEST_DIM),
        ..Default::default()
    }
}

pub fn build_engine(store: Arc<MemoryProfileStore>, config: EngineConfig) -> TestEngine {
    MatchEngine::new(
        store,
        Arc::new(StubEmbeddingProvider::with_dim(TEST_DIM)),
        config,
    )
}

pub struct ProfileBuilder {
    profile: Profile,
}

impl ProfileBuilder {
    pub fn named(name: &str) -> Self {
        Self {
            profile: Profile {
                id: Uuid::new_v4(),
                display_name: name.to_string(),
                birth_date: None,
                gender: Gender::Woman,
                seeking: vec![GenderFilter::Everyone],
                location: Location::new("Lisbon", "PT"),
                language: None,
            },
        }
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.profile.gender = gender;
        self
    }

    pub fn seeking(mut self, seeking: Vec<GenderFilter>) -> Self {
        self.profile.seeking = seeking;
        self
    }

    pub fn aged(mut self, age: u8) -> Self {
        let today = Utc::now().date_naive();
        self.profile.birth_date = NaiveDate::from_ymd_opt(today.year() - age as i32, 1, 1);
        self
    }

    pub fn located(mut self, city: &str, region: &str) -> Self {
        self.profile.location = Location::new(city, region);
        self
    }

    pub fn seed(self, store: &MemoryProfileStore) -> Profile {
        store.upsert_profile(self.profile.clone());
        self.profile
    }
}

/// A unit vector along the given axis.
pub fn unit_vector(axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; TEST_DIM];
    v[axis % TEST_DIM] = 1.0;
    v
}

pub fn seed_embedding(store: &MemoryProfileStore, id: Uuid, vector: Vec<f32>) {
    store.upsert_embedding(EmbeddingRecord::new(id, vector));
}

pub fn seed_taste_with_movies(store: &MemoryProfileStore, user: Uuid, movie_ids: &[&str]) {
    let mut taste = TasteProfile::empty(user);
    taste.movies = movie_ids
        .iter()
        .map(|id| TasteItem::new(*id, *id))
        .collect();
    store.upsert_taste(taste);
}
