//! Environment-backed engine configuration.
//!
//! Most settings have defaults. Override with `KINDRED_*` environment
//! variables; the fallback pool is structural and set programmatically at
//! startup.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::backfill::FallbackPool;
use crate::constants::{DEFAULT_CACHE_TTL_SECS, DEFAULT_MIN_RESULTS, DimConfig};

/// Engine configuration.
///
/// Use [`EngineConfig::from_env`] to read `KINDRED_*` overrides on top of
/// defaults, then attach the fallback pool with
/// [`with_fallback`](EngineConfig::with_fallback).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Lifetime of a cached ranked list. Default: one hour.
    pub cache_ttl: Duration,

    /// Floor under which the fallback pool tops the list up. Default: `5`.
    pub min_results: usize,

    /// Deployment-wide embedding dimension.
    pub dims: DimConfig,

    /// Ordered fallback candidate pool. Empty by default.
    pub fallback: FallbackPool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            min_results: DEFAULT_MIN_RESULTS,
            dims: DimConfig::default(),
            fallback: FallbackPool::default(),
        }
    }
}

impl EngineConfig {
    const ENV_CACHE_TTL_SECS: &'static str = "KINDRED_CACHE_TTL_SECS";
    const ENV_MIN_RESULTS: &'static str = "KINDRED_MIN_RESULTS";
    const ENV_EMBEDDING_DIM: &'static str = "KINDRED_EMBEDDING_DIM";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cache_ttl_secs = Self::parse_u64_from_env(
            Self::ENV_CACHE_TTL_SECS,
            defaults.cache_ttl.as_secs(),
        )?;
        let min_results =
            Self::parse_u64_from_env(Self::ENV_MIN_RESULTS, defaults.min_results as u64)?;
        let embedding_dim =
            Self::parse_u64_from_env(Self::ENV_EMBEDDING_DIM, defaults.dims.embedding_dim as u64)?;

        let config = Self {
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            min_results: min_results as usize,
            dims: DimConfig::new(embedding_dim as usize),
            fallback: FallbackPool::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Attaches the fallback pool.
    pub fn with_fallback(mut self, fallback: FallbackPool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Validates basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dims.validate()?;
        if self.min_results == 0 {
            return Err(ConfigError::ZeroMinResults);
        }
        Ok(())
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                value,
            }),
            Err(_) => Ok(default),
        }
    }
}
