//! In-memory profile store for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::profile::{EmbeddingRecord, MatchSettings, Profile, TasteProfile};

use super::error::StoreResult;
use super::ProfileStore;

/// `RwLock`-backed store; collections are independent, so a profile can
/// exist without a taste or embedding and vice versa.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
    tastes: RwLock<HashMap<Uuid, TasteProfile>>,
    embeddings: RwLock<HashMap<Uuid, EmbeddingRecord>>,
    settings: RwLock<HashMap<Uuid, MatchSettings>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_profile(&self, profile: Profile) {
        self.profiles.write().insert(profile.id, profile);
    }

    pub fn upsert_taste(&self, taste: TasteProfile) {
        self.tastes.write().insert(taste.user_id, taste);
    }

    pub fn upsert_embedding(&self, record: EmbeddingRecord) {
        self.embeddings.write().insert(record.profile_id, record);
    }

    /// Stores an embedding under an arbitrary key, regardless of the
    /// record's own `profile_id`. Lets tests seed identity-mismatched
    /// records the way a buggy external writer could.
    pub fn upsert_embedding_for(&self, key: Uuid, record: EmbeddingRecord) {
        self.embeddings.write().insert(key, record);
    }

    pub fn upsert_settings(&self, id: Uuid, settings: MatchSettings) {
        self.settings.write().insert(id, settings);
    }

    pub fn remove_embedding(&self, id: Uuid) {
        self.embeddings.write().remove(&id);
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.read().len()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn profile(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        Ok(self.profiles.read().get(&id).cloned())
    }

    async fn taste(&self, id: Uuid) -> StoreResult<Option<TasteProfile>> {
        Ok(self.tastes.read().get(&id).cloned())
    }

    async fn embedding(&self, id: Uuid) -> StoreResult<Option<EmbeddingRecord>> {
        Ok(self.embeddings.read().get(&id).cloned())
    }

    async fn match_settings(&self, id: Uuid) -> StoreResult<Option<MatchSettings>> {
        Ok(self.settings.read().get(&id).cloned())
    }

    async fn list_profiles(&self) -> StoreResult<Vec<Profile>> {
        Ok(self.profiles.read().values().cloned().collect())
    }

    async fn put_embedding(&self, record: EmbeddingRecord) -> StoreResult<()> {
        self.embeddings.write().insert(record.profile_id, record);
        Ok(())
    }
}
