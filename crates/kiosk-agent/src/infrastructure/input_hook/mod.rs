//! Input interception layer: system-wide low-level keyboard filter.
//!
//! On Windows this installs a `WH_KEYBOARD_LL` hook on a dedicated Win32
//! message-loop thread.  The hook callback consults the escape-key policy
//! and the *live* lockdown-active flag for every event; matching events are
//! consumed instead of being forwarded down the hook chain.
//!
//! # How a low-level keyboard hook works (for beginners)
//!
//! Windows delivers every keyboard event to registered `WH_KEYBOARD_LL`
//! callbacks *before* the focused application sees it.  A callback either
//! passes the event on with `CallNextHookEx` or returns a non-zero value,
//! which swallows the event system-wide.  The callback runs on the thread
//! that installed the hook and must return quickly (within ~300ms) or the
//! OS silently removes the hook — hence: no blocking work, no allocation,
//! no locks in the callback path.
//!
//! # At most one hook
//!
//! Only one filter hook may exist per process.  Requesting an install while
//! one is active is a no-op success, not a duplicate registration; the hook
//! may stay installed across lockdown toggles because the active flag, not
//! the hook's presence, decides whether events are swallowed.

use thiserror::Error;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Error type for keyboard filter operations.
#[derive(Debug, Error)]
pub enum HookError {
    /// The OS rejected the hook registration.
    #[error("failed to install keyboard filter hook: {0}")]
    InstallFailed(String),
    /// The hook could not be released cleanly.
    #[error("failed to uninstall keyboard filter hook: {0}")]
    UninstallFailed(String),
}

/// Trait abstracting the system-wide keyboard filter.
///
/// The production implementation uses a Windows low-level hook; tests use
/// [`mock::MockKeyboardFilter`].
pub trait KeyboardFilter: Send {
    /// Installs the filter.  A second install while one is active is a
    /// no-op success.
    fn install(&mut self) -> Result<(), HookError>;

    /// Releases the filter.  Uninstalling when none is installed is a
    /// no-op success.
    fn uninstall(&mut self) -> Result<(), HookError>;

    /// Returns `true` while the filter is installed.
    fn is_installed(&self) -> bool;
}
