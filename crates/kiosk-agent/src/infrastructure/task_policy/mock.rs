//! Mock task-manager policy for unit and integration testing.

use std::sync::{Arc, Mutex};

use super::{PolicyError, TaskManagerPolicy};

#[derive(Debug)]
struct MockPolicyState {
    disabled: bool,
    /// Simulates write access to the policy scope (false = access denied).
    write_allowed: bool,
    disable_calls: u32,
    restore_calls: u32,
}

/// A mock implementation of [`TaskManagerPolicy`] with controllable access.
#[derive(Clone)]
pub struct MockTaskManagerPolicy {
    inner: Arc<Mutex<MockPolicyState>>,
}

impl MockTaskManagerPolicy {
    /// Creates a mock with write access granted.
    pub fn new() -> Self {
        Self::with_write_allowed(true)
    }

    /// Creates a mock whose writes succeed iff `write_allowed` — a denied
    /// mock simulates running without elevation.
    pub fn with_write_allowed(write_allowed: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockPolicyState {
                disabled: false,
                write_allowed,
                disable_calls: 0,
                restore_calls: 0,
            })),
        }
    }

    /// Returns `true` while the simulated policy value is written.
    pub fn disabled(&self) -> bool {
        self.inner.lock().expect("lock poisoned").disabled
    }

    /// Number of disable calls that changed state.
    pub fn disable_calls(&self) -> u32 {
        self.inner.lock().expect("lock poisoned").disable_calls
    }

    /// Number of restore calls that changed state.
    pub fn restore_calls(&self) -> u32 {
        self.inner.lock().expect("lock poisoned").restore_calls
    }
}

impl Default for MockTaskManagerPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskManagerPolicy for MockTaskManagerPolicy {
    fn disable(&mut self) -> Result<(), PolicyError> {
        let mut state = self.inner.lock().expect("lock poisoned");
        if !state.write_allowed {
            // ERROR_ACCESS_DENIED
            return Err(PolicyError::RegistryFailed { op: "set", code: 5 });
        }
        if !state.disabled {
            state.disable_calls += 1;
            state.disabled = true;
        }
        Ok(())
    }

    fn restore(&mut self) -> Result<(), PolicyError> {
        let mut state = self.inner.lock().expect("lock poisoned");
        if !state.write_allowed {
            return Err(PolicyError::RegistryFailed { op: "delete", code: 5 });
        }
        if state.disabled {
            state.restore_calls += 1;
            state.disabled = false;
        }
        // Deleting an absent value is a no-op success.
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_then_restore_round_trips() {
        // Arrange
        let mut policy = MockTaskManagerPolicy::new();

        // Act / Assert
        policy.disable().expect("disable");
        assert!(policy.is_disabled());

        policy.restore().expect("restore");
        assert!(!policy.is_disabled());
    }

    #[test]
    fn test_disable_is_idempotent() {
        let mut policy = MockTaskManagerPolicy::new();
        policy.disable().expect("first");
        policy.disable().expect("second must be a no-op success");
        assert_eq!(policy.disable_calls(), 1);
    }

    #[test]
    fn test_restore_when_never_disabled_is_noop_success() {
        let mut policy = MockTaskManagerPolicy::new();
        assert!(policy.restore().is_ok());
        assert_eq!(policy.restore_calls(), 0);
    }

    #[test]
    fn test_denied_write_reports_error_without_state_change() {
        // Arrange
        let mut policy = MockTaskManagerPolicy::with_write_allowed(false);

        // Act
        let result = policy.disable();

        // Assert
        assert!(result.is_err());
        assert!(!policy.is_disabled());
    }
}
