//! Interaction ledger: likes, passes, matches and the exclusion sets
//! derived from them.
//!
//! The ledger is the source of truth for what a user has already decided
//! on. Ranked lists are ephemeral; this state is not.
//!
//! All mutating operations validate their ids up front and run under a
//! single write guard, so the reciprocal-like check and the confirmation
//! of both sides commit as one unit. No reader can observe one side of a
//! match `confirmed` and the other `pending`.

mod error;
mod types;


pub use error::{LedgerError, LedgerResult};
pub use types::{InteractionEvent, LikeStatus};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use types::LikeRecord;

#[derive(Debug, Default)]
struct LedgerState {
    /// At most one record per ordered `(from, to)` pair.
    likes: HashMap<(Uuid, Uuid), LikeRecord>,
    /// Pass records; one direction only.
    passes: HashMap<(Uuid, Uuid), DateTime<Utc>>,
    /// Best-effort served counters keyed by `(user, calendar day)`.
    served: HashMap<(Uuid, NaiveDate), u32>,
}

/// In-memory interaction ledger.
///
/// Writes serialize on one lock. The contended unit is the ordered like
/// pair, and a single guard over the whole map is the simplest structure
/// that makes reciprocal confirmation atomic.
#[derive(Debug, Default)]
pub struct InteractionLedger {
    state: RwLock<LedgerState>,
}

impl InteractionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate_pair(from: Uuid, to: Uuid) -> LedgerResult<()> {
        if from.is_nil() || to.is_nil() {
            return Err(LedgerError::invalid("user ids must be non-nil"));
        }
        if from == to {
            return Err(LedgerError::invalid("cannot interact with self"));
        }
        Ok(())
    }

    /// Records a like from `from` to `to`.
    ///
    /// If a reciprocal like (any status) already exists, both records move
    /// to [`LikeStatus::Confirmed`] under the same write guard and the
    /// call returns `Confirmed`. Re-liking an existing pair is idempotent:
    /// the stored record is untouched and its current status is returned.
    pub fn record_like(&self, from: Uuid, to: Uuid) -> LedgerResult<LikeStatus> {
        Self::validate_pair(from, to)?;

        let mut state = self.state.write();

        if let Some(existing) = state.likes.get(&(from, to)) {
            debug!(%from, %to, status = ?existing.status, "Duplicate like ignored");
            return Ok(existing.status);
        }

        let now = Utc::now();

        let status = if let Some(reciprocal) = state.likes.get_mut(&(to, from)) {
            reciprocal.status = LikeStatus::Confirmed;
            state.likes.insert(
                (from, to),
                LikeRecord {
                    status: LikeStatus::Confirmed,
                    at: now,
                },
            );
            info!(%from, %to, "Mutual like confirmed");
            LikeStatus::Confirmed
        } else {
            state.likes.insert(
                (from, to),
                LikeRecord {
                    status: LikeStatus::Pending,
                    at: now,
                },
            );
            debug!(%from, %to, "Like recorded as pending");
            LikeStatus::Pending
        };

        Ok(status)
    }

    /// Records a pass from `from` on `to`. Idempotent; the original
    /// timestamp is kept on repeat.
    pub fn record_pass(&self, from: Uuid, to: Uuid) -> LedgerResult<()> {
        Self::validate_pair(from, to)?;

        let mut state = self.state.write();
        state.passes.entry((from, to)).or_insert_with(Utc::now);
        debug!(%from, %to, "Pass recorded");
        Ok(())
    }

    /// Removes a pass record, making `to` eligible for `from` again.
    /// Removing a pass that does not exist is not an error.
    pub fn undo_pass(&self, from: Uuid, to: Uuid) -> LedgerResult<()> {
        Self::validate_pair(from, to)?;

        let removed = self.state.write().passes.remove(&(from, to)).is_some();
        debug!(%from, %to, removed, "Pass undone");
        Ok(())
    }

    /// The set of candidate ids `user` must never be shown again.
    ///
    /// Union of: every target of a like from `user` (any status), every
    /// counterpart of a confirmed pair touching `user`, and every target
    /// of a pass from `user`.
    pub fn exclusion_set(&self, user: Uuid) -> HashSet<Uuid> {
        let state = self.state.read();
        let mut excluded = HashSet::new();

        for ((from, to), record) in &state.likes {
            if *from == user {
                excluded.insert(*to);
            } else if *to == user && record.status.is_confirmed() {
                excluded.insert(*from);
            }
        }

        for (from, to) in state.passes.keys() {
            if *from == user {
                excluded.insert(*to);
            }
        }

        excluded
    }

    /// All interaction events touching `user`, most recent first.
    pub fn events_for(&self, user: Uuid) -> Vec<InteractionEvent> {
        let state = self.state.read();

        let mut events: Vec<InteractionEvent> = state
            .likes
            .iter()
            .map(|((from, to), record)| InteractionEvent::Like {
                from: *from,
                to: *to,
                status: record.status,
                at: record.at,
            })
            .chain(
                state
                    .passes
                    .iter()
                    .map(|((from, to), at)| InteractionEvent::Pass {
                        from: *from,
                        to: *to,
                        at: *at,
                    }),
            )
            .filter(|event| event.touches(user))
            .collect();

        events.sort_by(|a, b| event_time(b).cmp(&event_time(a)));
        events
    }

    /// Matches served to `user` on `day`.
    pub fn served_on(&self, user: Uuid, day: NaiveDate) -> u32 {
        *self.state.read().served.get(&(user, day)).unwrap_or(&0)
    }

    /// Adds `count` to the served counter for `(user, day)`. Best-effort
    /// monotonic; a lost update under race costs at most one extra served
    /// match.
    pub fn note_served_on(&self, user: Uuid, day: NaiveDate, count: u32) {
        if count == 0 {
            return;
        }
        let mut state = self.state.write();
        let counter = state.served.entry((user, day)).or_insert(0);
        *counter = counter.saturating_add(count);
    }

    /// Matches served to `user` today (UTC calendar day).
    pub fn served_today(&self, user: Uuid) -> u32 {
        self.served_on(user, Utc::now().date_naive())
    }

    /// Notes `count` matches served to `user` today.
    pub fn note_served(&self, user: Uuid, count: u32) {
        self.note_served_on(user, Utc::now().date_naive(), count);
    }
}

fn event_time(event: &InteractionEvent) -> DateTime<Utc> {
    match event {
        InteractionEvent::Like { at, .. } => *at,
        InteractionEvent::Pass { at, .. } => *at,
    }
}

/// Shared handle to an [`InteractionLedger`].
#[derive(Debug, Clone, Default)]
pub struct LedgerHandle {
    inner: Arc<InteractionLedger>,
}

impl LedgerHandle {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_like(&self, from: Uuid, to: Uuid) -> LedgerResult<LikeStatus> {
        self.inner.record_like(from, to)
    }

    #[inline]
    pub fn record_pass(&self, from: Uuid, to: Uuid) -> LedgerResult<()> {
        self.inner.record_pass(from, to)
    }

    #[inline]
    pub fn undo_pass(&self, from: Uuid, to: Uuid) -> LedgerResult<()> {
        self.inner.undo_pass(from, to)
    }

    #[inline]
    pub fn exclusion_set(&self, user: Uuid) -> HashSet<Uuid> {
        self.inner.exclusion_set(user)
    }

    #[inline]
    pub fn events_for(&self, user: Uuid) -> Vec<InteractionEvent> {
        self.inner.events_for(user)
    }

    #[inline]
    pub fn served_on(&self, user: Uuid, day: NaiveDate) -> u32 {
        self.inner.served_on(user, day)
    }

    #[inline]
    pub fn note_served_on(&self, user: Uuid, day: NaiveDate, count: u32) {
        self.inner.note_served_on(user, day, count)
    }

    #[inline]
    pub fn served_today(&self, user: Uuid) -> u32 {
        self.inner.served_today(user)
    }

    #[inline]
    pub fn note_served(&self, user: Uuid, count: u32) {
        self.inner.note_served(user, count)
    }

    /// Number of strong references to the underlying ledger.
    #[inline]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}
