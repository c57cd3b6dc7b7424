//! Outbound notification seam.
//!
//! The transport layer (sockets, push, whatever) owns connection state;
//! the core only gets this narrow interface and never holds transport
//! maps itself.

use uuid::Uuid;

/// Receives match-confirmation events.
///
/// Implementations must be cheap and non-blocking; the engine calls this
/// synchronously from the like path.
pub trait MatchNotifier: Send + Sync + 'static {
    /// Called once per newly confirmed pair, after the ledger write has
    /// committed.
    fn match_confirmed(&self, a: Uuid, b: Uuid);
}

/// Discards all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl MatchNotifier for NoopNotifier {
    fn match_confirmed(&self, _a: Uuid, _b: Uuid) {}
}

#[cfg(any(test, feature = "mock"))]
pub use recording::RecordingNotifier;

#[cfg(any(test, feature = "mock"))]
mod recording {
    use super::MatchNotifier;
    use parking_lot::Mutex;
    use uuid::Uuid;

    /// Captures notifications for assertions in tests.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        confirmed: Mutex<Vec<(Uuid, Uuid)>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn confirmed_pairs(&self) -> Vec<(Uuid, Uuid)> {
            self.confirmed.lock().clone()
        }
    }

    impl MatchNotifier for RecordingNotifier {
        fn match_confirmed(&self, a: Uuid, b: Uuid) {
            self.confirmed.lock().push((a, b));
        }
    }
}
