//! Method-call bridge: exposes controller operations to the host application.
//!
//! The host invokes the agent through a request/response relay — a method
//! name in, a success/boolean result out.  The transport itself is out of
//! scope; this module is the dispatch table that maps recognized method
//! names onto [`LockdownController`] calls.
//!
//! All recognized operations are argument-less, so there is no argument
//! validation here.  Unrecognized names yield [`MethodReply::NotImplemented`]
//! — a result, not an error, so the host's relay can surface it as the
//! platform's standard "not implemented" reply.

use serde::{Deserialize, Serialize};

use crate::application::lockdown::LockdownController;

/// Unified reply wrapper returned to the relay.
///
/// Serializes with a `status` tag so the transport layer can map replies
/// without inspecting which method was called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodReply {
    /// The operation ran; `value` is its boolean result.
    Success { value: bool },
    /// The method name is not part of the controller's contract.
    NotImplemented { method: String },
}

impl MethodReply {
    pub fn success(value: bool) -> Self {
        MethodReply::Success { value }
    }

    pub fn not_implemented(method: impl Into<String>) -> Self {
        MethodReply::NotImplemented {
            method: method.into(),
        }
    }
}

/// The method names the relay recognizes.
pub const RECOGNIZED_METHODS: [&str; 11] = [
    "enableLockdown",
    "disableLockdown",
    "isLockdownActive",
    "hideShell",
    "showShell",
    "blockInput",
    "unblockInput",
    "disableTaskManager",
    "enableTaskManager",
    "hasAdminPrivileges",
    "forceTeardown",
];

/// Routes one relay call to the controller.
///
/// Calls are dispatched from a single relay context, matching the
/// controller's single-caller contract.
pub fn dispatch_method(controller: &mut LockdownController, method: &str) -> MethodReply {
    match method {
        "enableLockdown" => MethodReply::success(controller.enable_lockdown()),
        "disableLockdown" => MethodReply::success(controller.disable_lockdown()),
        "isLockdownActive" => MethodReply::success(controller.is_lockdown_active()),
        "hideShell" => MethodReply::success(controller.hide_shell()),
        "showShell" => MethodReply::success(controller.show_shell()),
        "blockInput" => MethodReply::success(controller.block_input()),
        "unblockInput" => MethodReply::success(controller.unblock_input()),
        "disableTaskManager" => MethodReply::success(controller.disable_task_manager()),
        "enableTaskManager" => MethodReply::success(controller.enable_task_manager()),
        "hasAdminPrivileges" => MethodReply::success(controller.has_elevated_privileges()),
        "forceTeardown" => MethodReply::success(controller.force_teardown()),
        other => MethodReply::not_implemented(other),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_reply_serializes_with_status_tag() {
        // Arrange
        let reply = MethodReply::success(true);

        // Act
        let json = serde_json::to_string(&reply).unwrap();

        // Assert
        assert_eq!(json, r#"{"status":"success","value":true}"#);
    }

    #[test]
    fn test_not_implemented_reply_carries_the_method_name() {
        // Arrange
        let reply = MethodReply::not_implemented("captureFrame");

        // Act
        let json = serde_json::to_string(&reply).unwrap();

        // Assert
        assert_eq!(
            json,
            r#"{"status":"notImplemented","method":"captureFrame"}"#
        );
    }

    #[test]
    fn test_reply_round_trips_through_json() {
        let reply = MethodReply::success(false);
        let json = serde_json::to_string(&reply).unwrap();
        let restored: MethodReply = serde_json::from_str(&json).unwrap();
        assert_eq!(reply, restored);
    }

    #[test]
    fn test_recognized_methods_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for m in RECOGNIZED_METHODS {
            assert!(seen.insert(m), "duplicate method name {m}");
        }
    }
}
