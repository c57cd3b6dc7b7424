//! Embedding provider boundary.
//!
//! Embedding generation is external and may fail; failures degrade to
//! data absence (the user is scored via the fallback path only) and are
//! never propagated into the ranking caller. The engine calls the
//! provider eagerly when taste preferences change, outside the hot
//! ranking path.

mod error;
mod remote;

#[cfg(any(test, feature = "mock"))]
mod stub;


pub use error::{EmbeddingError, EmbeddingResult};
pub use remote::{HttpEmbeddingProvider, HttpEmbeddingProviderConfig};

#[cfg(any(test, feature = "mock"))]
pub use stub::StubEmbeddingProvider;

use async_trait::async_trait;

use crate::profile::TasteProfile;

/// Turns a taste profile into a fixed-dimension vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + 'static {
    async fn embed(&self, taste: &TasteProfile) -> EmbeddingResult<Vec<f32>>;
}
