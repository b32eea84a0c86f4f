use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Session-wide backend availability.
///
/// Starts available and can only ever be tripped. Clones share the same flag, so the
/// gateway, the store proxy and the feedback collector all observe the same state.
#[derive(Debug, Clone)]
pub struct SessionState {
    backend_available: Arc<AtomicBool>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            backend_available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// A session that never talks to the backend.
    pub fn offline() -> Self {
        let state = Self::new();
        state.backend_available.store(false, Ordering::SeqCst);
        state
    }

    pub fn backend_available(&self) -> bool {
        self.backend_available.load(Ordering::SeqCst)
    }

    /// Trip the latch. Returns `true` only for the call that actually tripped it.
    pub fn mark_backend_unavailable(&self, reason: &str) -> bool {
        let was_available = self.backend_available.swap(false, Ordering::SeqCst);
        if was_available {
            warn!("Backend marked unavailable for the rest of the session: {}", reason);
        }
        was_available
    }
}
