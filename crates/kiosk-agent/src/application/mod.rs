//! Application layer for the lockdown agent.
//!
//! The single use case here orchestrates the four restriction layers to
//! fulfil the enable/disable/force-reset operations.  It depends only on the
//! infrastructure traits and on `kiosk_core` domain types, so the whole
//! orchestration is unit-testable against mock layers — no OS calls, no
//! registry writes, no hook installs happen in this module's tests.
//!
//! # Sub-modules
//!
//! - **`lockdown`** – The [`lockdown::LockdownController`]: owns the
//!   process-wide lockdown state and every layer object, and guarantees the
//!   teardown-on-drop contract.

pub mod lockdown;
