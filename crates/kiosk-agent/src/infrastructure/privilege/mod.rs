//! Elevation probe: does the current process identity belong to the OS
//! administrator group?
//!
//! Read-only; the probe mutates nothing and is callable any number of times.
//! The controller never fails `enable_lockdown` for missing elevation — only
//! the specific layer whose OS call is rejected reports failure — so this
//! probe exists for the host application to warn the operator up front.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Trait abstracting the elevation check.
///
/// The production implementation asks the OS token; tests use
/// [`mock::MockPrivilegeProbe`].
pub trait PrivilegeProbe: Send {
    /// Returns `true` if the process identity is in the administrator group.
    fn is_elevated(&self) -> bool;
}
