//! Windows registry implementation of [`TaskManagerPolicy`].
//!
//! Writes/deletes the `DisableTaskMgr` REG_DWORD under
//! `HKCU\Software\Microsoft\Windows\CurrentVersion\Policies\System`.
//! Requires write access to the per-user policy scope; access-denied is
//! reported as a [`PolicyError`], never escalated.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use windows::core::PCWSTR;
use windows::Win32::Foundation::ERROR_FILE_NOT_FOUND;
use windows::Win32::System::Registry::{
    RegCloseKey, RegCreateKeyExW, RegDeleteValueW, RegOpenKeyExW, RegSetValueExW,
    HKEY, HKEY_CURRENT_USER, KEY_SET_VALUE, REG_DWORD, REG_OPTION_NON_VOLATILE,
};

use super::{PolicyError, TaskManagerPolicy};

/// Per-user policy key holding the task-manager switch.
const POLICY_SUBKEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Policies\System";
/// The boolean policy value: present + 1 means the task manager is disabled.
const POLICY_VALUE: &str = "DisableTaskMgr";

/// Windows registry-backed task-manager policy.
pub struct WindowsTaskManagerPolicy {
    /// `true` while this instance has written the policy value.
    disabled: bool,
}

impl WindowsTaskManagerPolicy {
    pub fn new() -> Self {
        Self { disabled: false }
    }
}

impl Default for WindowsTaskManagerPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// NUL-terminated UTF-16 encoding for registry name parameters.
fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

impl TaskManagerPolicy for WindowsTaskManagerPolicy {
    fn disable(&mut self) -> Result<(), PolicyError> {
        let subkey = wide(POLICY_SUBKEY);
        let value_name = wide(POLICY_VALUE);
        let mut hkey = HKEY::default();

        // SAFETY: all pointers reference NUL-terminated buffers that outlive
        // the call; phkResult receives the opened key on success.
        let status = unsafe {
            RegCreateKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR(subkey.as_ptr()),
                None,
                PCWSTR::null(),
                REG_OPTION_NON_VOLATILE,
                KEY_SET_VALUE,
                None,
                &mut hkey,
                None,
            )
        };
        if status.is_err() {
            return Err(PolicyError::RegistryFailed {
                op: "open",
                code: status.0,
            });
        }

        let data: u32 = 1;
        // SAFETY: the data slice is the little-endian bytes of a REG_DWORD.
        let status = unsafe {
            RegSetValueExW(
                hkey,
                PCWSTR(value_name.as_ptr()),
                None,
                REG_DWORD,
                Some(&data.to_le_bytes()),
            )
        };
        // SAFETY: hkey was opened above and is closed exactly once.
        let _ = unsafe { RegCloseKey(hkey) };

        if status.is_err() {
            return Err(PolicyError::RegistryFailed {
                op: "set",
                code: status.0,
            });
        }
        self.disabled = true;
        Ok(())
    }

    fn restore(&mut self) -> Result<(), PolicyError> {
        let subkey = wide(POLICY_SUBKEY);
        let value_name = wide(POLICY_VALUE);
        let mut hkey = HKEY::default();

        // SAFETY: see `disable`.
        let status = unsafe {
            RegOpenKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR(subkey.as_ptr()),
                None,
                KEY_SET_VALUE,
                &mut hkey,
            )
        };
        if status == ERROR_FILE_NOT_FOUND {
            // Key absent: the policy is already at OS default.
            self.disabled = false;
            return Ok(());
        }
        if status.is_err() {
            return Err(PolicyError::RegistryFailed {
                op: "open",
                code: status.0,
            });
        }

        // SAFETY: hkey is valid; the value name is NUL-terminated.
        let status = unsafe { RegDeleteValueW(hkey, PCWSTR(value_name.as_ptr())) };
        // SAFETY: hkey was opened above and is closed exactly once.
        let _ = unsafe { RegCloseKey(hkey) };

        // Deleting an absent value restores the default just as well.
        if status.is_err() && status != ERROR_FILE_NOT_FOUND {
            return Err(PolicyError::RegistryFailed {
                op: "delete",
                code: status.0,
            });
        }
        self.disabled = false;
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}
