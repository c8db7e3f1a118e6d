//! Escape-key filter policy.
//!
//! The low-level keyboard hook calls [`EscapeKeyPolicy::decide`] for every key
//! event it sees.  The decision depends on the event, the policy's suppressed
//! key set, and the lockdown-active flag *as it is at the moment of the
//! event* — the hook stays installed across enable/disable toggles in some
//! call sequences, so the flag must never be captured at install time.
//!
//! The hook callback runs on an OS-delivered thread and must return quickly,
//! so `decide` performs no allocation, no locking, and no I/O.

use crate::keys::{VK_DELETE, VK_ESCAPE, VK_LWIN, VK_RWIN, VK_TAB};

/// Modifier keys held down at the time of a key event.
///
/// The hook queries these out-of-band (the low-level hook struct carries only
/// the principal key), so they are a separate input to the decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierKeys {
    /// Either Ctrl key is held.
    pub ctrl: bool,
    /// Either Alt key is held.
    pub alt: bool,
}

/// A single keyboard event presented to the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Windows Virtual-Key code of the principal key.
    pub vk_code: u8,
    /// Modifier state sampled when the event was delivered.
    pub modifiers: ModifierKeys,
}

impl KeyEvent {
    /// Convenience constructor for an event with no modifiers held.
    pub fn bare(vk_code: u8) -> Self {
        Self {
            vk_code,
            modifiers: ModifierKeys::default(),
        }
    }
}

/// The filter's verdict for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Consume the event; it is not forwarded to the next handler.
    Suppress,
    /// Pass the event through to the next handler in the chain unchanged.
    Forward,
}

/// The set of key combinations swallowed while lockdown is active.
///
/// The default set blocks the task-switch escape paths: both Windows logo
/// keys, Tab, Escape, and the Ctrl+Alt+Del secure-attention combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeKeyPolicy {
    /// VK codes suppressed unconditionally while lockdown is active.
    suppressed: Vec<u8>,
}

impl Default for EscapeKeyPolicy {
    fn default() -> Self {
        Self {
            suppressed: vec![VK_LWIN, VK_RWIN, VK_TAB, VK_ESCAPE],
        }
    }
}

impl EscapeKeyPolicy {
    /// Creates a policy with a custom suppressed key set.
    ///
    /// The Ctrl+Alt+Del combination is always part of the policy and does not
    /// need to be listed.
    pub fn new(suppressed: Vec<u8>) -> Self {
        Self { suppressed }
    }

    /// Returns `true` if `vk_code` is in the unconditional suppressed set.
    pub fn is_escape_key(&self, vk_code: u8) -> bool {
        self.suppressed.contains(&vk_code)
    }

    /// Decides whether `event` is swallowed or forwarded.
    ///
    /// When `lockdown_active` is `false` every event forwards, including the
    /// designated escape keys — disabling lockdown restores input passthrough
    /// even if the hook itself is still installed.
    pub fn decide(&self, event: KeyEvent, lockdown_active: bool) -> FilterDecision {
        if !lockdown_active {
            return FilterDecision::Forward;
        }

        if self.is_escape_key(event.vk_code) {
            return FilterDecision::Suppress;
        }

        // Secure-attention combination: Del with both Ctrl and Alt held.
        if event.vk_code == VK_DELETE && event.modifiers.ctrl && event.modifiers.alt {
            return FilterDecision::Suppress;
        }

        FilterDecision::Forward
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
