//! LockdownController: orchestrates the four restriction layers.
//!
//! The controller owns the process-wide lockdown state and every layer
//! object; there are no free-standing globals.  Its public operations are
//! invoked from a single calling context (the host's message-dispatch
//! thread) and are not designed for concurrent invocation — callers
//! serialize their own calls, so no internal locking is provided.
//!
//! The one value shared across threads is the lockdown-active flag: the
//! keyboard filter callback reads it on an OS-delivered thread, so it is an
//! `Arc<AtomicBool>` handed to the filter at construction time.
//!
//! # Partial success
//!
//! `enable_lockdown` applies hide-shell, block-input, disable-task-manager
//! and start-monitor in that order and *continues through failures* — a
//! missing shell handle must not prevent input blocking.  The caller gets
//! the logical AND of the four outcomes; the active flag records intent and
//! is set regardless.  `disable_lockdown` reverses all four layers
//! unconditionally, independent of which ones succeeded during enable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use kiosk_core::{LockdownReport, RestrictionLayer};
use tracing::{info, warn};

use crate::infrastructure::input_hook::KeyboardFilter;
use crate::infrastructure::monitor::EscapeProcessMonitor;
use crate::infrastructure::privilege::PrivilegeProbe;
use crate::infrastructure::shell::ShellSurface;
use crate::infrastructure::task_policy::TaskManagerPolicy;

/// Owns lockdown state and the four restriction layers.
///
/// Dropping the controller while lockdown is active performs the same
/// unconditional best-effort teardown as [`force_teardown`] — no input hook
/// or watcher thread outlives the controller.
///
/// [`force_teardown`]: LockdownController::force_teardown
pub struct LockdownController {
    active: Arc<AtomicBool>,
    shell: Box<dyn ShellSurface>,
    input: Box<dyn KeyboardFilter>,
    task_policy: Box<dyn TaskManagerPolicy>,
    monitor: EscapeProcessMonitor,
    privilege: Box<dyn PrivilegeProbe>,
}

impl LockdownController {
    /// Assembles a controller from its layers.
    ///
    /// `active` is the same flag the keyboard filter was constructed with;
    /// the controller stores and mutates it, the filter only reads it.
    pub fn new(
        active: Arc<AtomicBool>,
        shell: Box<dyn ShellSurface>,
        input: Box<dyn KeyboardFilter>,
        task_policy: Box<dyn TaskManagerPolicy>,
        monitor: EscapeProcessMonitor,
        privilege: Box<dyn PrivilegeProbe>,
    ) -> Self {
        Self {
            active,
            shell,
            input,
            task_policy,
            monitor,
            privilege,
        }
    }

    // ── Aggregate operations ──────────────────────────────────────────────────

    /// Enters lockdown: sets the active flag, then applies all four layers.
    ///
    /// Returns the logical AND of the layer outcomes.  Individual failures
    /// are logged and folded into the aggregate, never raised.
    pub fn enable_lockdown(&mut self) -> bool {
        self.active.store(true, Ordering::SeqCst);

        let mut report = LockdownReport::new();
        report.record(RestrictionLayer::ShellVisibility, self.hide_shell());
        report.record(RestrictionLayer::InputInterception, self.block_input());
        report.record(RestrictionLayer::TaskManagerPolicy, self.disable_task_manager());
        report.record(RestrictionLayer::EscapeMonitor, self.start_monitor());

        if report.all_applied() {
            info!("lockdown enabled");
        } else {
            let failed: Vec<_> = report.failed_layers().collect();
            warn!(?failed, "lockdown enabled with failed layers");
        }
        report.all_applied()
    }

    /// Exits lockdown: clears the active flag, then reverses all four
    /// layers unconditionally.
    pub fn disable_lockdown(&mut self) -> bool {
        self.active.store(false, Ordering::SeqCst);

        let mut report = LockdownReport::new();
        report.record(RestrictionLayer::ShellVisibility, self.show_shell());
        report.record(RestrictionLayer::InputInterception, self.unblock_input());
        report.record(RestrictionLayer::TaskManagerPolicy, self.enable_task_manager());
        report.record(RestrictionLayer::EscapeMonitor, self.stop_monitor());

        if report.all_applied() {
            info!("lockdown disabled");
        } else {
            let failed: Vec<_> = report.failed_layers().collect();
            warn!(?failed, "lockdown disabled with failed layers");
        }
        report.all_applied()
    }

    /// Pure read of the lockdown state flag; no side effects.
    pub fn is_lockdown_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Emergency reset: releases every resource this controller might hold,
    /// regardless of recorded state, and clears the active flag.
    ///
    /// Safe to call at any time, including when nothing is locked down or
    /// when recorded state has diverged from actual OS state (crash residue,
    /// external interference).  Reports completion, not per-layer status:
    /// this is the last line of defence and the caller must never be left
    /// uncertain whether to retry.
    pub fn force_teardown(&mut self) -> bool {
        self.active.store(false, Ordering::SeqCst);

        if let Err(e) = self.input.uninstall() {
            warn!("teardown: keyboard filter uninstall failed: {e}");
        }
        self.monitor.stop();
        if let Err(e) = self.shell.show() {
            warn!("teardown: shell restore failed: {e}");
        }
        if let Err(e) = self.task_policy.restore() {
            warn!("teardown: task-manager policy restore failed: {e}");
        }

        info!("forced teardown complete");
        true
    }

    // ── Per-layer toggles ─────────────────────────────────────────────────────

    /// Hides the shell surface.  Already hidden is a no-op success.
    pub fn hide_shell(&mut self) -> bool {
        match self.shell.hide() {
            Ok(()) => true,
            Err(e) => {
                warn!("hide shell failed: {e}");
                false
            }
        }
    }

    /// Restores the shell surface.  Never hidden is a no-op success.
    pub fn show_shell(&mut self) -> bool {
        match self.shell.show() {
            Ok(()) => true,
            Err(e) => {
                warn!("show shell failed: {e}");
                false
            }
        }
    }

    /// Installs the keyboard filter.  Already installed is a no-op success.
    pub fn block_input(&mut self) -> bool {
        match self.input.install() {
            Ok(()) => true,
            Err(e) => {
                warn!("block input failed: {e}");
                false
            }
        }
    }

    /// Releases the keyboard filter.  Not installed is a no-op success.
    pub fn unblock_input(&mut self) -> bool {
        match self.input.uninstall() {
            Ok(()) => true,
            Err(e) => {
                warn!("unblock input failed: {e}");
                false
            }
        }
    }

    /// Writes the task-manager policy value.  Already written is a no-op
    /// success; access denied fails only this layer.
    pub fn disable_task_manager(&mut self) -> bool {
        match self.task_policy.disable() {
            Ok(()) => true,
            Err(e) => {
                warn!("disable task manager failed: {e}");
                false
            }
        }
    }

    /// Deletes the task-manager policy value, restoring the OS default.
    /// An absent value is a no-op success.
    pub fn enable_task_manager(&mut self) -> bool {
        match self.task_policy.restore() {
            Ok(()) => true,
            Err(e) => {
                warn!("enable task manager failed: {e}");
                false
            }
        }
    }

    /// Starts the escape-process watcher; returns without waiting for its
    /// first polling iteration.  Already running is a no-op success.
    pub fn start_monitor(&mut self) -> bool {
        match self.monitor.start() {
            Ok(()) => true,
            Err(e) => {
                warn!("start monitor failed: {e}");
                false
            }
        }
    }

    /// Stops the escape-process watcher, blocking until the worker thread
    /// has fully exited.  Already stopped is a no-op success.
    pub fn stop_monitor(&mut self) -> bool {
        self.monitor.stop();
        true
    }

    // ── Probes ────────────────────────────────────────────────────────────────

    /// Read-only capability probe; mutates nothing.
    pub fn has_elevated_privileges(&self) -> bool {
        self.privilege.is_elevated()
    }
}

impl Drop for LockdownController {
    fn drop(&mut self) {
        // Same unconditional best-effort teardown as force_teardown(); all
        // internal failures are swallowed.
        self.active.store(false, Ordering::SeqCst);
        let _ = self.input.uninstall();
        self.monitor.stop();
        let _ = self.shell.show();
        let _ = self.task_policy.restore();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::infrastructure::input_hook::mock::MockKeyboardFilter;
    use crate::infrastructure::monitor::mock::MockEscapeProbe;
    use crate::infrastructure::privilege::mock::MockPrivilegeProbe;
    use crate::infrastructure::shell::mock::MockShellSurface;
    use crate::infrastructure::task_policy::mock::MockTaskManagerPolicy;

    /// Handles to the mock layers, kept by tests after the controller takes
    /// its clones.
    struct Rig {
        shell: MockShellSurface,
        filter: MockKeyboardFilter,
        policy: MockTaskManagerPolicy,
        probe: MockEscapeProbe,
        active: Arc<AtomicBool>,
    }

    fn make_controller_with(
        shell: MockShellSurface,
        policy: MockTaskManagerPolicy,
        elevated: bool,
    ) -> (LockdownController, Rig) {
        let active = Arc::new(AtomicBool::new(false));
        let filter = MockKeyboardFilter::new(Arc::clone(&active));
        let probe = MockEscapeProbe::new();
        let monitor = EscapeProcessMonitor::new(
            Arc::new(probe.clone()),
            Duration::from_millis(20),
        );
        let controller = LockdownController::new(
            Arc::clone(&active),
            Box::new(shell.clone()),
            Box::new(filter.clone()),
            Box::new(policy.clone()),
            monitor,
            Box::new(MockPrivilegeProbe::new(elevated)),
        );
        let rig = Rig {
            shell,
            filter,
            policy,
            probe,
            active,
        };
        (controller, rig)
    }

    fn make_controller() -> (LockdownController, Rig) {
        make_controller_with(MockShellSurface::new(), MockTaskManagerPolicy::new(), true)
    }

    #[test]
    fn test_enable_applies_all_four_layers() {
        // Arrange
        let (mut controller, rig) = make_controller();

        // Act
        let ok = controller.enable_lockdown();

        // Assert
        assert!(ok);
        assert!(controller.is_lockdown_active());
        assert!(rig.shell.hidden());
        assert!(rig.filter.installed());
        assert!(rig.policy.disabled());

        controller.disable_lockdown();
    }

    #[test]
    fn test_disable_restores_all_four_layers() {
        // Arrange
        let (mut controller, rig) = make_controller();
        controller.enable_lockdown();

        // Act
        let ok = controller.disable_lockdown();

        // Assert
        assert!(ok);
        assert!(!controller.is_lockdown_active());
        assert!(!rig.shell.hidden());
        assert!(!rig.filter.installed());
        assert!(!rig.policy.disabled());
    }

    #[test]
    fn test_enable_continues_past_shell_failure() {
        // Arrange: the shell handle never resolves.
        let (mut controller, rig) = make_controller_with(
            MockShellSurface::with_resolvable(false),
            MockTaskManagerPolicy::new(),
            true,
        );

        // Act
        let ok = controller.enable_lockdown();

        // Assert – aggregate false, but the state flag is set and the other
        // three layers are applied.
        assert!(!ok);
        assert!(controller.is_lockdown_active());
        assert!(rig.filter.installed());
        assert!(rig.policy.disabled());

        controller.disable_lockdown();
    }

    #[test]
    fn test_denied_policy_write_fails_only_that_layer() {
        // Arrange: no write access to the policy scope (no elevation).
        let (mut controller, rig) = make_controller_with(
            MockShellSurface::new(),
            MockTaskManagerPolicy::with_write_allowed(false),
            false,
        );

        // Act
        let ok = controller.enable_lockdown();

        // Assert
        assert!(!ok, "aggregate must reflect the failed layer");
        assert!(controller.is_lockdown_active());
        assert!(rig.shell.hidden());
        assert!(rig.filter.installed());
        assert!(!rig.policy.disabled());

        controller.disable_lockdown();
    }

    #[test]
    fn test_toggles_are_idempotent() {
        // Arrange
        let (mut controller, rig) = make_controller();

        // Act / Assert – each toggle twice, true both times, one transition.
        assert!(controller.hide_shell());
        assert!(controller.hide_shell());
        assert_eq!(rig.shell.hide_calls(), 1);

        assert!(controller.block_input());
        assert!(controller.block_input());
        assert_eq!(rig.filter.install_calls(), 1);

        assert!(controller.disable_task_manager());
        assert!(controller.disable_task_manager());
        assert_eq!(rig.policy.disable_calls(), 1);

        assert!(controller.start_monitor());
        assert!(controller.start_monitor());

        controller.force_teardown();
    }

    #[test]
    fn test_force_teardown_when_inactive_is_observable_noop() {
        // Arrange
        let (mut controller, rig) = make_controller();

        // Act
        let ok = controller.force_teardown();

        // Assert – always true, and nothing changed.
        assert!(ok);
        assert!(!controller.is_lockdown_active());
        assert!(!rig.shell.hidden());
        assert!(!rig.filter.installed());
        assert!(!rig.policy.disabled());
        assert_eq!(rig.policy.restore_calls(), 0);
    }

    #[test]
    fn test_force_teardown_recovers_partial_lockdown() {
        // Arrange: input blocked and policy written, shell never hidden
        // because the handle did not resolve.
        let (mut controller, rig) = make_controller_with(
            MockShellSurface::with_resolvable(false),
            MockTaskManagerPolicy::new(),
            true,
        );
        controller.enable_lockdown();
        assert!(rig.filter.installed());
        assert!(rig.policy.disabled());

        // Act
        let ok = controller.force_teardown();

        // Assert
        assert!(ok);
        assert!(!controller.is_lockdown_active());
        assert!(!rig.filter.installed(), "input passthrough restored");
        assert!(!rig.policy.disabled(), "policy cleared");
    }

    #[test]
    fn test_privilege_probe_is_pure() {
        // Arrange
        let (controller, rig) = make_controller();

        // Act
        let first = controller.has_elevated_privileges();
        let second = controller.has_elevated_privileges();

        // Assert – identical answers, no state mutated.
        assert_eq!(first, second);
        assert!(!controller.is_lockdown_active());
        assert!(!rig.shell.hidden());
        assert!(!rig.filter.installed());
        assert!(!rig.policy.disabled());
    }

    #[test]
    fn test_drop_releases_hook_and_watcher() {
        // Arrange
        let (mut controller, rig) = make_controller();
        controller.enable_lockdown();
        assert!(rig.filter.installed());

        // Act
        drop(controller);

        // Assert
        assert!(!rig.filter.installed(), "hook must not outlive the controller");
        assert!(!rig.shell.hidden());
        assert!(!rig.policy.disabled());
        assert!(!rig.active.load(Ordering::SeqCst));

        // The watcher thread was joined in drop; no further probes occur.
        let probes = rig.probe.probe_calls();
        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(rig.probe.probe_calls(), probes);
    }
}
