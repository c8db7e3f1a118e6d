//! Windows implementation of [`PrivilegeProbe`].
//!
//! Builds the well-known BUILTIN\Administrators SID and asks the OS whether
//! the current thread/process token is a member.  No token state is changed.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use windows::core::BOOL;
use windows::Win32::Security::{
    AllocateAndInitializeSid, CheckTokenMembership, FreeSid, PSID, SECURITY_NT_AUTHORITY,
};
use windows::Win32::System::SystemServices::{
    DOMAIN_ALIAS_RID_ADMINS, SECURITY_BUILTIN_DOMAIN_RID,
};

use super::PrivilegeProbe;

/// Token-membership based elevation probe.
pub struct WindowsPrivilegeProbe;

impl WindowsPrivilegeProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsPrivilegeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl PrivilegeProbe for WindowsPrivilegeProbe {
    fn is_elevated(&self) -> bool {
        let mut admin_group = PSID::default();

        // SAFETY: standard two-subauthority build of the BUILTIN\Administrators
        // SID; the SID is freed below on every path that allocated it.
        let allocated = unsafe {
            AllocateAndInitializeSid(
                &SECURITY_NT_AUTHORITY,
                2,
                SECURITY_BUILTIN_DOMAIN_RID as u32,
                DOMAIN_ALIAS_RID_ADMINS as u32,
                0,
                0,
                0,
                0,
                0,
                0,
                &mut admin_group,
            )
        };
        if allocated.is_err() {
            return false;
        }

        let mut is_member = BOOL(0);
        // SAFETY: a null token handle means "the current thread's token";
        // admin_group is a valid SID allocated above.
        let checked = unsafe { CheckTokenMembership(None, admin_group, &mut is_member) };

        // SAFETY: admin_group was allocated by AllocateAndInitializeSid.
        let _ = unsafe { FreeSid(admin_group) };

        checked.is_ok() && is_member.as_bool()
    }
}
