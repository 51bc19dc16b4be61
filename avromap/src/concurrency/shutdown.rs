//! Cooperative shutdown signaling for the pipeline.
//!
//! The pipeline is single-threaded and pull-based, so shutdown is advisory:
//! the encode adapter checks the token once per record and stops with a
//! cancellation error when it is set. Clones share the same flag, so a signal
//! handler or another thread can request the stop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag requesting that the pipeline stop processing records.
#[derive(Clone, Debug, Default)]
pub struct ShutdownToken {
    cancelled: Arc<AtomicBool>,
}

impl ShutdownToken {
    /// Creates a token in the non-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Visible to all clones of this token.
    pub fn shutdown(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns whether shutdown has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
