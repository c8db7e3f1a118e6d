//! Task-manager policy layer: a single boolean policy value in per-user
//! OS configuration storage.
//!
//! Disabling writes the value; enabling *deletes* it rather than writing a
//! negated value, so the OS default behaviour is restored exactly instead of
//! being overridden.  This is the one piece of lockdown state that survives
//! process restart — a crashed agent can leave the policy behind, which is
//! why the binary calls `force_teardown` proactively at startup.

use thiserror::Error;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Error type for task-manager policy operations.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A registry operation failed (typically access denied without
    /// elevation).
    #[error("registry {op} failed with code {code}")]
    RegistryFailed {
        /// Which operation failed (`open`, `set`, `delete`).
        op: &'static str,
        /// The OS error code.
        code: u32,
    },
}

/// Trait abstracting the task-manager policy value.
///
/// The production implementation writes the `DisableTaskMgr` registry value;
/// tests use [`mock::MockTaskManagerPolicy`].
pub trait TaskManagerPolicy: Send {
    /// Writes the policy value that disables the task manager.
    ///
    /// Writing when already written is a no-op success.
    fn disable(&mut self) -> Result<(), PolicyError>;

    /// Deletes the policy value, restoring the OS default.
    ///
    /// Deleting an absent value is a no-op success.
    fn restore(&mut self) -> Result<(), PolicyError>;

    /// Returns `true` while this instance has the policy value written.
    fn is_disabled(&self) -> bool;
}
