//! Per-layer outcome bookkeeping for multi-layer lockdown operations.
//!
//! `enable_lockdown` / `disable_lockdown` touch four restriction layers and
//! must not short-circuit on the first failure — a missing shell handle must
//! not prevent input blocking.  The report records each layer's outcome and
//! derives the aggregate boolean the caller sees: the logical AND of all
//! recorded outcomes.

use serde::{Deserialize, Serialize};

/// The four restriction layers the controller orchestrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionLayer {
    /// Taskbar / dock visibility.
    ShellVisibility,
    /// Low-level keyboard filter.
    InputInterception,
    /// OS task-manager policy value.
    TaskManagerPolicy,
    /// Background escape-process watcher.
    EscapeMonitor,
}

impl RestrictionLayer {
    /// All layers in the order the controller applies them on enable.
    pub const APPLY_ORDER: [RestrictionLayer; 4] = [
        RestrictionLayer::ShellVisibility,
        RestrictionLayer::InputInterception,
        RestrictionLayer::TaskManagerPolicy,
        RestrictionLayer::EscapeMonitor,
    ];
}

/// Outcome record for one multi-layer operation.
///
/// A fresh report treats untouched layers as successful, so a report that
/// records nothing aggregates to `true` — matching the contract that
/// `force_teardown` always reports completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockdownReport {
    shell: bool,
    input: bool,
    task_manager: bool,
    monitor: bool,
}

impl Default for LockdownReport {
    fn default() -> Self {
        Self {
            shell: true,
            input: true,
            task_manager: true,
            monitor: true,
        }
    }
}

impl LockdownReport {
    /// Creates a report with every layer marked successful.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of one layer.
    pub fn record(&mut self, layer: RestrictionLayer, ok: bool) {
        match layer {
            RestrictionLayer::ShellVisibility => self.shell = ok,
            RestrictionLayer::InputInterception => self.input = ok,
            RestrictionLayer::TaskManagerPolicy => self.task_manager = ok,
            RestrictionLayer::EscapeMonitor => self.monitor = ok,
        }
    }

    /// Returns the recorded outcome for one layer.
    pub fn outcome(&self, layer: RestrictionLayer) -> bool {
        match layer {
            RestrictionLayer::ShellVisibility => self.shell,
            RestrictionLayer::InputInterception => self.input,
            RestrictionLayer::TaskManagerPolicy => self.task_manager,
            RestrictionLayer::EscapeMonitor => self.monitor,
        }
    }

    /// The aggregate boolean: logical AND of all layer outcomes.
    pub fn all_applied(&self) -> bool {
        self.shell && self.input && self.task_manager && self.monitor
    }

    /// Layers whose outcome is recorded as failed, in apply order.
    pub fn failed_layers(&self) -> impl Iterator<Item = RestrictionLayer> + '_ {
        RestrictionLayer::APPLY_ORDER
            .into_iter()
            .filter(|l| !self.outcome(*l))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_report_aggregates_to_true() {
        // Arrange / Act
        let report = LockdownReport::new();

        // Assert
        assert!(report.all_applied());
        assert_eq!(report.failed_layers().count(), 0);
    }

    #[test]
    fn test_single_failure_makes_aggregate_false() {
        // Arrange
        let mut report = LockdownReport::new();

        // Act
        report.record(RestrictionLayer::ShellVisibility, false);

        // Assert
        assert!(!report.all_applied());
        assert!(!report.outcome(RestrictionLayer::ShellVisibility));
        // Other layers are unaffected.
        assert!(report.outcome(RestrictionLayer::InputInterception));
        assert!(report.outcome(RestrictionLayer::TaskManagerPolicy));
        assert!(report.outcome(RestrictionLayer::EscapeMonitor));
    }

    #[test]
    fn test_failed_layers_lists_failures_in_apply_order() {
        // Arrange
        let mut report = LockdownReport::new();
        report.record(RestrictionLayer::EscapeMonitor, false);
        report.record(RestrictionLayer::ShellVisibility, false);

        // Act
        let failed: Vec<_> = report.failed_layers().collect();

        // Assert
        assert_eq!(
            failed,
            vec![
                RestrictionLayer::ShellVisibility,
                RestrictionLayer::EscapeMonitor
            ]
        );
    }

    #[test]
    fn test_recording_success_overwrites_earlier_failure() {
        let mut report = LockdownReport::new();
        report.record(RestrictionLayer::InputInterception, false);
        report.record(RestrictionLayer::InputInterception, true);
        assert!(report.all_applied());
    }

    #[test]
    fn test_apply_order_covers_all_four_layers() {
        let mut seen = std::collections::HashSet::new();
        for layer in RestrictionLayer::APPLY_ORDER {
            seen.insert(format!("{layer:?}"));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_report_serializes_with_snake_case_layers() {
        // The layer enum is part of diagnostic output; keep the wire names stable.
        let json = serde_json::to_string(&RestrictionLayer::ShellVisibility).unwrap();
        assert_eq!(json, "\"shell_visibility\"");
    }
}
