//! The matching pipeline, end to end.
//!
//! One engine instance serves all users. A `get_matches` request flows
//! exclusion set → hard filters → scoring → ranking → backfill, with the
//! final list cached per user under a short TTL. Interaction writes go
//! through the ledger and bust the cache for both sides.
//!
//! Candidate-level problems (missing records, dimension mismatches,
//! scoring failures) drop that one candidate with a diagnostic and never
//! abort the run. Only ledger and store writes are fail-closed.

mod error;


pub use error::{EngineError, EngineResult};
pub use crate::scoring::MatchMode;

use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::backfill;
use crate::cache::ResultCacheHandle;
use crate::config::EngineConfig;
use crate::constants;
use crate::embedding::EmbeddingProvider;
use crate::filter;
use crate::ledger::{InteractionEvent, LedgerHandle, LikeStatus};
use crate::notify::{MatchNotifier, NoopNotifier};
use crate::profile::{EmbeddingRecord, MatchSettings, Profile};
use crate::ranking::{self, RankOptions, RankedMatch};
use crate::scoring::{CompatibilityScorer, MatchContext, ProximityScorer, ScoredCandidate};
use crate::store::ProfileStore;

/// Profile-matching engine.
pub struct MatchEngine<S, P> {
    store: Arc<S>,
    provider: Arc<P>,
    ledger: LedgerHandle,
    cache: ResultCacheHandle,
    notifier: Arc<dyn MatchNotifier>,
    scorer: CompatibilityScorer,
    proximity: ProximityScorer,
    config: EngineConfig,
}

impl<S, P> std::fmt::Debug for MatchEngine<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: ProfileStore, P: EmbeddingProvider> MatchEngine<S, P> {
    /// Creates an engine with a fresh ledger and cache.
    pub fn new(store: Arc<S>, provider: Arc<P>, config: EngineConfig) -> Self {
        Self {
            cache: ResultCacheHandle::with_ttl(config.cache_ttl),
            scorer: CompatibilityScorer::new(config.dims),
            proximity: ProximityScorer::new(),
            ledger: LedgerHandle::new(),
            notifier: Arc::new(NoopNotifier),
            store,
            provider,
            config,
        }
    }

    /// Replaces the (default no-op) match notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn MatchNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn ledger(&self) -> &LedgerHandle {
        &self.ledger
    }

    pub fn cache(&self) -> &ResultCacheHandle {
        &self.cache
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the ranked, deduplicated, quota-limited match list for a
    /// user.
    ///
    /// Within the cache TTL the underlying list is stable; the daily
    /// quota is re-applied live on every call, so repeat calls can serve
    /// progressively fewer entries.
    #[instrument(skip(self), fields(user = %user, mode = ?mode))]
    pub async fn get_matches(&self, user: Uuid, mode: MatchMode) -> EngineResult<Vec<RankedMatch>> {
        if user.is_nil() {
            return Err(EngineError::InvalidInput {
                reason: "user id must be non-nil".to_string(),
            });
        }

        let profile = self
            .store
            .profile(user)
            .await?
            .ok_or(EngineError::UnknownUser(user))?;

        let mut settings = self
            .store
            .match_settings(user)
            .await?
            .unwrap_or_default();
        settings.normalize();

        let snapshot = match self.cache.get(user, mode) {
            Some(hit) => {
                debug!(entries = hit.len(), "Serving cached ranking");
                hit
            }
            None => {
                let computed = self.compute_ranking(&profile, &settings, mode).await?;
                info!(entries = computed.len(), "Computed fresh ranking");
                self.cache.insert(user, mode, computed)
            }
        };

        let served = self.ledger.served_today(user);
        let remaining = settings.daily_quota.saturating_sub(served) as usize;
        let list: Vec<RankedMatch> = snapshot.iter().take(remaining).cloned().collect();
        self.ledger.note_served(user, list.len() as u32);

        debug!(
            served_today = served,
            returned = list.len(),
            "Applied daily quota"
        );
        Ok(list)
    }

    /// Records a like. On mutual confirmation, both ranked caches are
    /// already invalidated and the notifier is told exactly once.
    pub async fn like(&self, from: Uuid, to: Uuid) -> EngineResult<LikeStatus> {
        let status = self.ledger.record_like(from, to)?;

        self.cache.invalidate(from);
        self.cache.invalidate(to);

        if status.is_confirmed() {
            info!(%from, %to, "Match confirmed");
            self.notifier.match_confirmed(from, to);
        }
        Ok(status)
    }

    /// Records a pass; `to` disappears from `from`'s results.
    pub async fn pass(&self, from: Uuid, to: Uuid) -> EngineResult<()> {
        self.ledger.record_pass(from, to)?;
        self.cache.invalidate(from);
        self.cache.invalidate(to);
        Ok(())
    }

    /// Undoes a pass; `to` becomes eligible for `from` again, subject to
    /// the ordinary filters.
    pub async fn undo_pass(&self, from: Uuid, to: Uuid) -> EngineResult<()> {
        self.ledger.undo_pass(from, to)?;
        self.cache.invalidate(from);
        self.cache.invalidate(to);
        Ok(())
    }

    /// All interaction events touching `user`, most recent first.
    pub async fn interaction_status(&self, user: Uuid) -> EngineResult<Vec<InteractionEvent>> {
        if user.is_nil() {
            return Err(EngineError::InvalidInput {
                reason: "user id must be non-nil".to_string(),
            });
        }
        Ok(self.ledger.events_for(user))
    }

    /// Eagerly re-embeds a user's taste profile after it changed.
    ///
    /// Runs outside the ranking hot path. Provider failure is logged and
    /// degrades to data absence; the previous record is kept. Store write
    /// failures propagate (fail-closed).
    pub async fn refresh_embedding(&self, user: Uuid) -> EngineResult<()> {
        self.cache.invalidate(user);

        let Some(taste) = self.store.taste(user).await? else {
            debug!(%user, "No taste profile; nothing to embed");
            return Ok(());
        };

        let vector = match self.provider.embed(&taste).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(%user, error = %e, "Embedding provider failed; keeping previous record");
                return Ok(());
            }
        };

        if let Err(e) =
            constants::validate_embedding_dim(self.config.dims.embedding_dim, vector.len())
        {
            warn!(%user, error = %e, "Provider returned wrong dimension; keeping previous record");
            return Ok(());
        }

        // The derived signature is produced alongside the vector upstream;
        // carry the previous one until the provider replaces it.
        let signature = self
            .store
            .embedding(user)
            .await?
            .and_then(|record| record.signature);

        let mut record = EmbeddingRecord::new(user, vector);
        record.signature = signature;
        self.store.put_embedding(record).await?;

        info!(%user, "Embedding refreshed");
        Ok(())
    }

    /// Fire-and-forget variant of [`refresh_embedding`] for change hooks
    /// that must not block the caller.
    ///
    /// [`refresh_embedding`]: MatchEngine::refresh_embedding
    pub fn spawn_refresh_embedding(self: &Arc<Self>, user: Uuid) {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = engine.refresh_embedding(user).await {
                warn!(%user, error = %e, "Background embedding refresh failed");
            }
        });
    }

    /// Settings/preference-change hook: busts the cached ranking only.
    pub fn invalidate_user(&self, user: Uuid) {
        self.cache.invalidate(user);
    }

    async fn compute_ranking(
        &self,
        profile: &Profile,
        settings: &MatchSettings,
        mode: MatchMode,
    ) -> EngineResult<Vec<RankedMatch>> {
        let pool = self.store.list_profiles().await?;
        let exclusion = self.ledger.exclusion_set(profile.id);
        let candidates = filter::eligible(pool, profile, settings, &exclusion);
        let today = Utc::now().date_naive();

        debug!(
            eligible = candidates.len(),
            excluded = exclusion.len(),
            "Filtered candidate pool"
        );

        let scored = match mode {
            MatchMode::Location => candidates
                .into_iter()
                .map(|candidate| {
                    let breakdown = self.proximity.score_on(profile, &candidate, today);
                    ScoredCandidate::new(candidate, breakdown)
                })
                .collect(),
            MatchMode::Preferences => {
                self.score_preferences(profile, settings, candidates).await?
            }
        };

        let opts = RankOptions::from(settings);
        let mut ranked = ranking::rank_on(scored, &opts, today);

        if ranked.len() < self.config.min_results && !self.config.fallback.is_empty() {
            let fallback_profiles = self.resolve_fallback_profiles().await;
            ranked = backfill::backfill(
                ranked,
                self.config.min_results,
                &fallback_profiles,
                self.config.fallback.featured,
                profile,
                settings,
                &exclusion,
                today,
            );
        }

        Ok(ranked)
    }

    async fn score_preferences(
        &self,
        user: &Profile,
        settings: &MatchSettings,
        candidates: Vec<Profile>,
    ) -> EngineResult<Vec<ScoredCandidate>> {
        let user_taste = self.store.taste(user.id).await?;

        let user_embedding = match self.store.embedding(user.id).await? {
            Some(record) if record.has_vector() => {
                if record.profile_id == user.id {
                    Some(record)
                } else {
                    warn!(
                        user = %user.id,
                        record = %record.profile_id,
                        "Requester embedding identity mismatch; treating as absent"
                    );
                    None
                }
            }
            _ => None,
        };

        let Some(user_embedding) = user_embedding else {
            debug!(user = %user.id, "Requester has no embedding; fallback-only path");
            return Ok(Vec::new());
        };

        let weights = settings
            .weights
            .or_else(|| user_taste.as_ref().map(|t| t.weights))
            .unwrap_or_default();

        // Candidate contexts load concurrently; each candidate's two
        // lookups still run back to back.
        let loads = candidates.into_iter().map(|candidate| async move {
            let taste = self.store.taste(candidate.id).await;
            let embedding = self.store.embedding(candidate.id).await;
            (candidate, taste, embedding)
        });
        let loaded = join_all(loads).await;

        let user_ctx = MatchContext::new(user, user_taste.as_ref(), &user_embedding);
        let mut scored = Vec::with_capacity(loaded.len());

        for (candidate, taste, embedding) in loaded {
            let taste = match taste {
                Ok(taste) => taste,
                Err(e) => {
                    warn!(candidate = %candidate.id, error = %e, "Taste load failed; excluding candidate");
                    continue;
                }
            };
            let embedding = match embedding {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!(candidate = %candidate.id, error = %e, "Embedding load failed; excluding candidate");
                    continue;
                }
            };

            let Some(embedding) = embedding else {
                debug!(candidate = %candidate.id, "No embedding record; candidate left to fallback pool");
                continue;
            };
            if !embedding.has_vector() {
                debug!(candidate = %candidate.id, "Empty embedding vector; candidate left to fallback pool");
                continue;
            }
            if embedding.profile_id != candidate.id {
                warn!(
                    candidate = %candidate.id,
                    record = %embedding.profile_id,
                    "Embedding record identity mismatch; excluding candidate"
                );
                continue;
            }
            if violates_deal_breakers(settings, &embedding) {
                debug!(candidate = %candidate.id, "Deal-breaker trait; excluding candidate");
                continue;
            }

            let candidate_ctx = MatchContext::new(&candidate, taste.as_ref(), &embedding);
            match self.scorer.score(&user_ctx, &candidate_ctx, weights) {
                Ok(breakdown) => scored.push(ScoredCandidate::new(candidate, breakdown)),
                Err(e) => {
                    warn!(candidate = %candidate.id, error = %e, "Scoring failed; excluding candidate");
                }
            }
        }

        Ok(scored)
    }

    /// Resolves the configured fallback pool to live profiles, keeping
    /// pool order. Unresolvable ids are skipped, not fatal.
    async fn resolve_fallback_profiles(&self) -> Vec<Profile> {
        let ids = self.config.fallback.ordered_ids();
        let loads = ids.iter().map(|&id| self.store.profile(id));
        let loaded = join_all(loads).await;

        let mut profiles = Vec::with_capacity(ids.len());
        for (id, result) in ids.iter().zip(loaded) {
            match result {
                Ok(Some(profile)) => profiles.push(profile),
                Ok(None) => debug!(%id, "Fallback profile missing from store"),
                Err(e) => warn!(%id, error = %e, "Fallback profile load failed"),
            }
        }
        profiles
    }
}

fn violates_deal_breakers(settings: &MatchSettings, embedding: &EmbeddingRecord) -> bool {
    if settings.deal_breakers.is_empty() {
        return false;
    }
    let Some(signature) = embedding.signature.as_ref() else {
        return false;
    };
    settings.deal_breakers.iter().any(|breaker| {
        signature
            .dominant_traits
            .iter()
            .any(|t| t.eq_ignore_ascii_case(breaker))
    })
}
