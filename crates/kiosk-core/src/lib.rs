//! # kiosk-core
//!
//! Shared library for the kiosk lockdown controller containing the escape-key
//! filter policy, the restriction-layer outcome report, and the Windows
//! Virtual-Key constants the policy refers to.
//!
//! This crate is used by the agent application and its tests.
//! It has zero dependencies on OS APIs, hook registries, or threads.
//!
//! # Architecture overview (for beginners)
//!
//! A kiosk deployment runs one full-screen application and must prevent the
//! person at the keyboard from escaping to the desktop.  The agent enforces
//! four restrictions while lockdown is active: the OS shell chrome is hidden,
//! escape key combinations are swallowed before normal dispatch, the
//! task-manager policy is disabled, and a watcher closes the task manager if
//! it appears anyway.
//!
//! This crate (`kiosk-core`) is the pure foundation.  It defines:
//!
//! - **`domain::policy`** – Which key events are swallowed.  The decision is a
//!   pure function of the event, the policy's key set, and the current
//!   lockdown-active flag, so it can be tested without installing a hook.
//!
//! - **`domain::report`** – The per-layer outcome bookkeeping.  A multi-layer
//!   operation touches all four restriction layers and reports the logical
//!   AND of their outcomes; individual failures never abort the operation.

// Declare the top-level modules.  Rust will look for each in a
// subdirectory or file with the same name (e.g., src/domain/mod.rs).
pub mod domain;
pub mod keys;

// Re-export the most-used types at the crate root so callers can write
// `kiosk_core::EscapeKeyPolicy` instead of the full module path.
pub use domain::policy::{EscapeKeyPolicy, FilterDecision, KeyEvent, ModifierKeys};
pub use domain::report::{LockdownReport, RestrictionLayer};
