//! Mock keyboard filter for unit and integration testing.
//!
//! Allows tests to "deliver" synthetic key events and observe the filter
//! decision that the real hook callback would have made, without installing
//! an OS hook.  State lives behind an `Arc` so tests keep a clone after
//! moving the mock into the controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use kiosk_core::{EscapeKeyPolicy, FilterDecision, KeyEvent};

use super::{HookError, KeyboardFilter};

#[derive(Debug)]
struct MockHookState {
    installed: bool,
    install_fails: bool,
    install_calls: u32,
    uninstall_calls: u32,
}

/// A mock implementation of [`KeyboardFilter`] driven by the same policy and
/// active flag as the production hook.
#[derive(Clone)]
pub struct MockKeyboardFilter {
    inner: Arc<Mutex<MockHookState>>,
    active: Arc<AtomicBool>,
    policy: EscapeKeyPolicy,
}

impl MockKeyboardFilter {
    /// Creates a mock filter sharing `active` with the controller, using the
    /// default escape-key policy.
    pub fn new(active: Arc<AtomicBool>) -> Self {
        Self::with_policy(active, EscapeKeyPolicy::default())
    }

    /// Creates a mock filter with a custom policy.
    pub fn with_policy(active: Arc<AtomicBool>, policy: EscapeKeyPolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockHookState {
                installed: false,
                install_fails: false,
                install_calls: 0,
                uninstall_calls: 0,
            })),
            active,
            policy,
        }
    }

    /// Makes subsequent install attempts fail, simulating an OS rejection.
    pub fn fail_installs(&self) {
        self.inner.lock().expect("lock poisoned").install_fails = true;
    }

    /// Simulates the hook callback for one event.
    ///
    /// Returns `None` when no filter is installed (the event never reaches a
    /// callback), otherwise the decision the callback would return — computed
    /// from the policy and the active flag *as it is now*.
    pub fn deliver(&self, event: KeyEvent) -> Option<FilterDecision> {
        let state = self.inner.lock().expect("lock poisoned");
        if !state.installed {
            return None;
        }
        Some(self.policy.decide(event, self.active.load(Ordering::SeqCst)))
    }

    /// Returns `true` while the mock hook is installed.
    pub fn installed(&self) -> bool {
        self.inner.lock().expect("lock poisoned").installed
    }

    /// Number of install calls that were not no-ops.
    pub fn install_calls(&self) -> u32 {
        self.inner.lock().expect("lock poisoned").install_calls
    }

    /// Number of uninstall calls that were not no-ops.
    pub fn uninstall_calls(&self) -> u32 {
        self.inner.lock().expect("lock poisoned").uninstall_calls
    }
}

impl KeyboardFilter for MockKeyboardFilter {
    fn install(&mut self) -> Result<(), HookError> {
        let mut state = self.inner.lock().expect("lock poisoned");
        if state.installed {
            return Ok(());
        }
        if state.install_fails {
            return Err(HookError::InstallFailed("simulated rejection".to_string()));
        }
        state.install_calls += 1;
        state.installed = true;
        Ok(())
    }

    fn uninstall(&mut self) -> Result<(), HookError> {
        let mut state = self.inner.lock().expect("lock poisoned");
        if !state.installed {
            return Ok(());
        }
        state.uninstall_calls += 1;
        state.installed = false;
        Ok(())
    }

    fn is_installed(&self) -> bool {
        self.installed()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
