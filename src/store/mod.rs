//! Profile store boundary.
//!
//! The store is an external collaborator: profiles, tastes, embeddings and
//! settings are each an independent collection keyed by identity, with no
//! foreign-key enforcement. All joins happen in memory in the engine and
//! must tolerate a missing counterpart record, so every lookup returns an
//! `Option`.

mod error;

#[cfg(any(test, feature = "mock"))]
mod memory;

pub use error::{StoreError, StoreResult};

#[cfg(any(test, feature = "mock"))]
pub use memory::MemoryProfileStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::profile::{EmbeddingRecord, MatchSettings, Profile, TasteProfile};

/// Read access to user records, plus the single write path the engine
/// needs for eagerly refreshed embeddings.
#[async_trait]
pub trait ProfileStore: Send + Sync + 'static {
    async fn profile(&self, id: Uuid) -> StoreResult<Option<Profile>>;

    async fn taste(&self, id: Uuid) -> StoreResult<Option<TasteProfile>>;

    async fn embedding(&self, id: Uuid) -> StoreResult<Option<EmbeddingRecord>>;

    /// Stored per-user overrides; `None` means the engine applies
    /// [`MatchSettings::default`].
    async fn match_settings(&self, id: Uuid) -> StoreResult<Option<MatchSettings>>;

    /// The full candidate pool.
    async fn list_profiles(&self) -> StoreResult<Vec<Profile>>;

    /// Replaces the embedding record for `record.profile_id`.
    async fn put_embedding(&self, record: EmbeddingRecord) -> StoreResult<()>;
}
