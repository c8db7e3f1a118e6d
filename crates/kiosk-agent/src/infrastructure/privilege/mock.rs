//! Mock elevation probe for unit and integration testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use super::PrivilegeProbe;

/// A mock implementation of [`PrivilegeProbe`] with a fixed answer.
#[derive(Clone)]
pub struct MockPrivilegeProbe {
    elevated: bool,
    queries: Arc<AtomicU32>,
}

impl MockPrivilegeProbe {
    /// Creates a probe reporting the given elevation state.
    pub fn new(elevated: bool) -> Self {
        Self {
            elevated,
            queries: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Number of times the probe was queried.
    pub fn queries(&self) -> u32 {
        self.queries.load(Ordering::SeqCst)
    }
}

impl PrivilegeProbe for MockPrivilegeProbe {
    fn is_elevated(&self) -> bool {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.elevated
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
