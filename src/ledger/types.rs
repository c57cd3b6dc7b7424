//! Interaction event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a like record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeStatus {
    /// One-directional like, waiting for a reciprocal.
    Pending,
    /// Both directions liked; the pair is a match.
    Confirmed,
}

impl LikeStatus {
    #[inline]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, LikeStatus::Confirmed)
    }
}

/// One recorded interaction, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionEvent {
    Like {
        from: Uuid,
        to: Uuid,
        status: LikeStatus,
        at: DateTime<Utc>,
    },
    Pass {
        from: Uuid,
        to: Uuid,
        at: DateTime<Utc>,
    },
}

impl InteractionEvent {
    /// Returns `true` if the event involves `user` on either side.
    pub fn touches(&self, user: Uuid) -> bool {
        match self {
            InteractionEvent::Like { from, to, .. } => *from == user || *to == user,
            InteractionEvent::Pass { from, to, .. } => *from == user || *to == user,
        }
    }
}

/// Internal like record, keyed by the ordered `(from, to)` pair.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LikeRecord {
    pub status: LikeStatus,
    pub at: DateTime<Utc>,
}
