//! Windows Virtual-Key constants referenced by the escape-key policy.
//!
//! Only the handful of VK codes the policy cares about are defined here, so
//! that `kiosk-core` stays free of the `windows` crate.  Values are from
//! `<winuser.h>`; see the Virtual-Key Codes reference:
//! https://learn.microsoft.com/windows/win32/inputdev/virtual-key-codes

/// Tab key.
pub const VK_TAB: u8 = 0x09;
/// Ctrl (either side, as reported by a low-level hook's modifier query).
pub const VK_CONTROL: u8 = 0x11;
/// Alt key (named "menu" in winuser.h for historical reasons).
pub const VK_MENU: u8 = 0x12;
/// Escape key.
pub const VK_ESCAPE: u8 = 0x1B;
/// Delete key.
pub const VK_DELETE: u8 = 0x2E;
/// Left Windows logo key.
pub const VK_LWIN: u8 = 0x5B;
/// Right Windows logo key.
pub const VK_RWIN: u8 = 0x5C;
