//! Shell visibility layer: hides and restores the OS taskbar surface.
//!
//! The shell surface is looked up by its well-known window class on the first
//! hide request and cached for the session.  If the lookup fails the hide
//! reports an error and caches nothing, so a later retry starts clean.
//! Re-showing a surface that was never hidden is a no-op success.

use thiserror::Error;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Error type for shell visibility operations.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The shell surface could not be resolved by its window class.
    #[error("shell surface {class:?} not found")]
    SurfaceNotFound {
        /// The window class that was looked up.
        class: String,
    },
    /// The OS rejected the visibility change.
    #[error("failed to change shell visibility: {0}")]
    VisibilityChangeFailed(String),
}

/// Trait abstracting the taskbar/dock surface.
///
/// The production implementation wraps `FindWindowW` + `ShowWindow`; tests
/// use [`mock::MockShellSurface`].
pub trait ShellSurface: Send {
    /// Hides the shell surface, resolving and caching the handle if needed.
    ///
    /// Hiding an already-hidden surface is a no-op success.
    fn hide(&mut self) -> Result<(), ShellError>;

    /// Restores the shell surface.
    ///
    /// Showing a surface this instance never hid is a no-op success.
    fn show(&mut self) -> Result<(), ShellError>;

    /// Returns `true` while this instance has the surface hidden.
    fn is_hidden(&self) -> bool;
}
