//! Mock escape probe for unit and integration testing.
//!
//! Counts probe and close calls so tests can assert that the watcher ran,
//! and that it stopped running once `stop()` returned.

use std::sync::{Arc, Mutex};

use super::{EscapeProbe, EscapeWindow};

#[derive(Debug)]
struct MockProbeState {
    window_present: bool,
    probe_calls: u32,
    close_requests: u32,
}

/// A mock implementation of [`EscapeProbe`] with a switchable window.
#[derive(Clone)]
pub struct MockEscapeProbe {
    inner: Arc<Mutex<MockProbeState>>,
}

impl MockEscapeProbe {
    /// Creates a probe that never finds the escape window.
    pub fn new() -> Self {
        Self::with_window_present(false)
    }

    /// Creates a probe whose lookup finds a window iff `present`.
    pub fn with_window_present(present: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockProbeState {
                window_present: present,
                probe_calls: 0,
                close_requests: 0,
            })),
        }
    }

    /// Makes the simulated escape window appear or disappear.
    pub fn set_window_present(&self, present: bool) {
        self.inner.lock().expect("lock poisoned").window_present = present;
    }

    /// Number of lookups performed by the watcher.
    pub fn probe_calls(&self) -> u32 {
        self.inner.lock().expect("lock poisoned").probe_calls
    }

    /// Number of graceful-close requests issued.
    pub fn close_requests(&self) -> u32 {
        self.inner.lock().expect("lock poisoned").close_requests
    }
}

impl Default for MockEscapeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl EscapeProbe for MockEscapeProbe {
    fn find_escape_window(&self) -> Option<EscapeWindow> {
        let mut state = self.inner.lock().expect("lock poisoned");
        state.probe_calls += 1;
        state.window_present.then_some(EscapeWindow(0x7A5C))
    }

    fn request_close(&self, _window: EscapeWindow) {
        self.inner.lock().expect("lock poisoned").close_requests += 1;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
