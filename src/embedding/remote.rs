//! HTTP-backed embedding provider.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::constants::{self, DEFAULT_EMBEDDING_DIM};
use crate::profile::TasteProfile;

use super::error::{EmbeddingError, EmbeddingResult};
use super::EmbeddingProvider;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`HttpEmbeddingProvider`].
#[derive(Debug, Clone)]
pub struct HttpEmbeddingProviderConfig {
    /// Endpoint the taste profile is POSTed to as JSON.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Expected vector dimension; responses of any other length are
    /// rejected.
    pub embedding_dim: usize,
}

impl HttpEmbeddingProviderConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// Provider that delegates to an external embedding service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    config: HttpEmbeddingProviderConfig,
}

impl HttpEmbeddingProvider {
    pub fn new(config: HttpEmbeddingProviderConfig) -> EmbeddingResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpEmbeddingProviderConfig {
        &self.config
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, taste: &TasteProfile) -> EmbeddingResult<Vec<f32>> {
        debug!(user = %taste.user_id, endpoint = %self.config.endpoint, "Requesting embedding");

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(taste)
            .send()
            .await?
            .error_for_status()?;

        let body: EmbedResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        constants::validate_embedding_dim(self.config.embedding_dim, body.embedding.len())?;

        if body.embedding.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::InvalidResponse {
                reason: "vector contains non-finite values".to_string(),
            });
        }

        Ok(body.embedding)
    }
}
