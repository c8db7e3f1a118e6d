//! Mock shell surface for unit and integration testing.
//!
//! State lives behind an `Arc` so a test can keep a clone of the mock after
//! moving another clone into the controller, and observe what the controller
//! did to it.

use std::sync::{Arc, Mutex};

use super::{ShellError, ShellSurface};

#[derive(Debug)]
struct MockShellState {
    /// Whether the simulated lookup succeeds.
    resolvable: bool,
    /// Whether the handle has been "resolved" (cached).
    resolved: bool,
    hidden: bool,
    hide_calls: u32,
    show_calls: u32,
}

/// A mock implementation of [`ShellSurface`] with a controllable lookup.
#[derive(Clone)]
pub struct MockShellSurface {
    inner: Arc<Mutex<MockShellState>>,
}

impl MockShellSurface {
    /// Creates a mock whose surface lookup always succeeds.
    pub fn new() -> Self {
        Self::with_resolvable(true)
    }

    /// Creates a mock whose surface lookup succeeds iff `resolvable`.
    pub fn with_resolvable(resolvable: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockShellState {
                resolvable,
                resolved: false,
                hidden: false,
                hide_calls: 0,
                show_calls: 0,
            })),
        }
    }

    /// Returns `true` while the simulated surface is hidden.
    pub fn hidden(&self) -> bool {
        self.inner.lock().expect("lock poisoned").hidden
    }

    /// Returns `true` if a handle was cached by a successful hide.
    pub fn handle_cached(&self) -> bool {
        self.inner.lock().expect("lock poisoned").resolved
    }

    /// Number of `hide` calls that reached the OS-facing layer.
    pub fn hide_calls(&self) -> u32 {
        self.inner.lock().expect("lock poisoned").hide_calls
    }

    /// Number of `show` calls that reached the OS-facing layer.
    pub fn show_calls(&self) -> u32 {
        self.inner.lock().expect("lock poisoned").show_calls
    }
}

impl Default for MockShellSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellSurface for MockShellSurface {
    fn hide(&mut self) -> Result<(), ShellError> {
        let mut state = self.inner.lock().expect("lock poisoned");
        if state.hidden {
            return Ok(());
        }
        state.hide_calls += 1;
        if !state.resolvable {
            // Failed lookup must not cache a handle.
            return Err(ShellError::SurfaceNotFound {
                class: "Shell_TrayWnd".to_string(),
            });
        }
        state.resolved = true;
        state.hidden = true;
        Ok(())
    }

    fn show(&mut self) -> Result<(), ShellError> {
        let mut state = self.inner.lock().expect("lock poisoned");
        state.show_calls += 1;
        state.hidden = false;
        Ok(())
    }

    fn is_hidden(&self) -> bool {
        self.inner.lock().expect("lock poisoned").hidden
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hide_then_show_round_trips_visibility() {
        // Arrange
        let mut surface = MockShellSurface::new();

        // Act / Assert
        surface.hide().expect("hide should succeed");
        assert!(surface.is_hidden());

        surface.show().expect("show should succeed");
        assert!(!surface.is_hidden());
    }

    #[test]
    fn test_hide_is_idempotent() {
        // Arrange
        let mut surface = MockShellSurface::new();

        // Act
        surface.hide().expect("first hide");
        surface.hide().expect("second hide must be a no-op success");

        // Assert – the second call never reached the OS-facing layer
        assert_eq!(surface.hide_calls(), 1);
    }

    #[test]
    fn test_unresolvable_surface_reports_error_and_caches_nothing() {
        // Arrange
        let mut surface = MockShellSurface::with_resolvable(false);

        // Act
        let result = surface.hide();

        // Assert
        assert!(result.is_err());
        assert!(!surface.handle_cached(), "failed lookup must not cache");
        assert!(!surface.is_hidden());
    }

    #[test]
    fn test_show_when_never_hidden_is_noop_success() {
        let mut surface = MockShellSurface::new();
        assert!(surface.show().is_ok());
        assert!(!surface.is_hidden());
    }

    #[test]
    fn test_clone_shares_state_with_original() {
        // Arrange
        let surface = MockShellSurface::new();
        let mut handle = surface.clone();

        // Act
        handle.hide().expect("hide");

        // Assert – visible through the original
        assert!(surface.hidden());
    }
}
