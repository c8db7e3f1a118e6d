//! Infrastructure layer for the lockdown agent.
//!
//! Contains OS-facing adapters: the shell visibility toggle, the low-level
//! keyboard filter hook, the task-manager registry policy, the escape-process
//! probe, the elevation probe, configuration storage, and the method-call
//! bridge the host application invokes.
//!
//! Every OS-facing concern is a trait with a `windows` implementation (gated
//! on `cfg(target_os = "windows")`) and a `mock` implementation used by tests
//! and the headless build.
//!
//! **Dependency rule**: the `application` layer sees only the traits and
//! error types defined in these modules, never the `windows` implementations
//! — those are selected at wiring time in `main.rs` (or by a test).

pub mod bridge;
pub mod input_hook;
pub mod monitor;
pub mod privilege;
pub mod shell;
pub mod storage;
pub mod task_policy;
