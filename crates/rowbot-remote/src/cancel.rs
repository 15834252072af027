use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared flag requesting that running games stop.
///
/// Clones share the same flag. Sessions check it before every turn and tear down their
/// subprocess when it is set.
///
/// A read in progress is not interrupted. With `read_timeout_ms` set to `null`, a game
/// that stops printing keeps the session blocked and the cancellation is only seen once
/// the game prints its next prompt or exits.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
