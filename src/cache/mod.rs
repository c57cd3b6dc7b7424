//! Short-TTL memoization of ranked lists.
//!
//! Entries are keyed by the owning user and request mode, and expire on a
//! fixed TTL or on explicit invalidation (preference, embedding or
//! interaction change for that owner). The cached list is a snapshot; the
//! live daily quota is re-applied by the engine on every serve, cached or
//! not.


use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;
use uuid::Uuid;

use crate::constants::DEFAULT_CACHE_TTL_SECS;
use crate::ranking::RankedMatch;
use crate::scoring::MatchMode;

/// A cached ranked-list snapshot, shared cheaply between hits.
pub type CachedRanking = Arc<Vec<RankedMatch>>;

/// TTL-bound cache of ranked lists, one entry per user and mode.
pub struct ResultCache {
    entries: Cache<(Uuid, MatchMode), CachedRanking>,
    ttl: Duration,
}

impl ResultCache {
    const DEFAULT_CAPACITY: u64 = 100_000;

    /// Creates a cache with the default one-hour TTL.
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }

    /// Creates a cache with an explicit TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(Self::DEFAULT_CAPACITY)
                .time_to_live(ttl)
                .build(),
            ttl,
        }
    }

    /// The configured entry lifetime.
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the live snapshot for `(user, mode)`, if any.
    #[inline]
    pub fn get(&self, user: Uuid, mode: MatchMode) -> Option<CachedRanking> {
        self.entries.get(&(user, mode))
    }

    /// Stores a snapshot, replacing any existing entry for the key.
    #[inline]
    pub fn insert(&self, user: Uuid, mode: MatchMode, ranking: Vec<RankedMatch>) -> CachedRanking {
        let snapshot: CachedRanking = Arc::new(ranking);
        self.entries.insert((user, mode), Arc::clone(&snapshot));
        snapshot
    }

    /// Drops every entry owned by `user`, across all modes.
    pub fn invalidate(&self, user: Uuid) {
        debug!(%user, "Invalidating cached rankings");
        for mode in MatchMode::ALL {
            self.entries.invalidate(&(user, mode));
        }
    }

    /// Drops every entry.
    #[inline]
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Returns `true` if no entries are cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    /// Runs any pending maintenance tasks in the underlying cache.
    #[inline]
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("entries", &self.entries.entry_count())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Shared handle to a [`ResultCache`].
#[derive(Clone, Debug)]
pub struct ResultCacheHandle {
    inner: Arc<ResultCache>,
}

impl ResultCacheHandle {
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ResultCache::new()),
        }
    }

    #[inline]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(ResultCache::with_ttl(ttl)),
        }
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.inner.ttl()
    }

    #[inline]
    pub fn get(&self, user: Uuid, mode: MatchMode) -> Option<CachedRanking> {
        self.inner.get(user, mode)
    }

    #[inline]
    pub fn insert(&self, user: Uuid, mode: MatchMode, ranking: Vec<RankedMatch>) -> CachedRanking {
        self.inner.insert(user, mode, ranking)
    }

    #[inline]
    pub fn invalidate(&self, user: Uuid) {
        self.inner.invalidate(user)
    }

    #[inline]
    pub fn clear(&self) {
        self.inner.clear()
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks()
    }
}

impl Default for ResultCacheHandle {
    fn default() -> Self {
        Self::new()
    }
}
