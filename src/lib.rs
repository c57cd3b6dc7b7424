//! Kindred matching library (used by the transport layer and integration
//! tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`EngineConfig`], [`ConfigError`] - Engine configuration
//! - [`Profile`], [`TasteProfile`], [`MatchSettings`] - Data model
//! - [`MatchEngine`], [`MatchMode`] - The matching pipeline
//!
//! ## Pipeline Stages
//! - [`InteractionLedger`], [`LedgerHandle`] - Likes, passes, exclusion sets
//! - [`CompatibilityScorer`], [`ProximityScorer`] - Scoring
//! - [`rank`], [`RankedMatch`] - Ranking & deduplication
//! - [`FallbackPool`], [`backfill::backfill`] - Non-empty guarantee
//! - [`ResultCache`], [`ResultCacheHandle`] - Short-TTL memoization
//!
//! ## Boundaries
//! - [`ProfileStore`] - External profile/taste/embedding storage
//! - [`EmbeddingProvider`], [`HttpEmbeddingProvider`] - Embedding generation
//! - [`MatchNotifier`] - Narrow outbound notification seam
//!
//! ## Constants
//! Score caps and thresholds are exported for consistency across modules.
//! Prefer [`DimConfig`] for runtime dimension configuration.
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod backfill;
pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod engine;
pub mod filter;
pub mod ledger;
pub mod notify;
pub mod profile;
pub mod ranking;
pub mod scoring;
pub mod store;

pub use backfill::FallbackPool;
pub use cache::{CachedRanking, ResultCache, ResultCacheHandle};
pub use config::{ConfigError, EngineConfig};
pub use constants::{DimConfig, DimValidationError, validate_embedding_dim};
pub use embedding::{
    EmbeddingError, EmbeddingProvider, EmbeddingResult, HttpEmbeddingProvider,
    HttpEmbeddingProviderConfig,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::StubEmbeddingProvider;
pub use engine::{EngineError, EngineResult, MatchEngine, MatchMode};
pub use filter::eligible;
pub use ledger::{
    InteractionEvent, InteractionLedger, LedgerError, LedgerHandle, LedgerResult, LikeStatus,
};
pub use notify::{MatchNotifier, NoopNotifier};
#[cfg(any(test, feature = "mock"))]
pub use notify::RecordingNotifier;
pub use profile::{
    CategoryWeights, EmbeddingRecord, EmotionalProfile, Gender, GenderFilter, Location,
    MatchSettings, Profile, TasteItem, TasteProfile, TasteSignature, accepts_gender,
};
pub use ranking::{MatchOrigin, RankOptions, RankedMatch, rank, rank_on};
pub use scoring::{
    CompatibilityScorer, MatchContext, ProximityScorer, ScoreBreakdown, ScoredCandidate,
    ScoringError, ScoringResult, cosine_similarity, identity_compatibility, jaccard,
};
pub use store::{ProfileStore, StoreError, StoreResult};
#[cfg(any(test, feature = "mock"))]
pub use store::MemoryProfileStore;
