//! Windows implementation of [`EscapeProbe`].
//!
//! Looks up the task-manager window by its class name and asks it to close
//! with `WM_CLOSE` — a graceful close request, not a process kill.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::ffi::c_void;

use windows::core::PCWSTR;
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{FindWindowW, PostMessageW, WM_CLOSE};

use super::{EscapeProbe, EscapeWindow};

/// Probe for the task-manager window (class `TaskManagerWindow` by default).
pub struct WindowsEscapeProbe {
    /// NUL-terminated UTF-16 window class, pre-encoded so each poll avoids
    /// re-encoding.
    window_class: Vec<u16>,
}

impl WindowsEscapeProbe {
    pub fn new(window_class: &str) -> Self {
        Self {
            window_class: window_class.encode_utf16().chain(std::iter::once(0)).collect(),
        }
    }
}

impl EscapeProbe for WindowsEscapeProbe {
    fn find_escape_window(&self) -> Option<EscapeWindow> {
        // SAFETY: window_class is NUL-terminated and outlives the call.
        let found = unsafe { FindWindowW(PCWSTR(self.window_class.as_ptr()), PCWSTR::null()) };
        match found {
            Ok(hwnd) if !hwnd.0.is_null() => Some(EscapeWindow(hwnd.0 as isize)),
            _ => None,
        }
    }

    fn request_close(&self, window: EscapeWindow) {
        // SAFETY: posting to a window that disappeared since the lookup is
        // harmless; PostMessageW fails without faulting.
        let _ = unsafe {
            PostMessageW(
                Some(HWND(window.0 as *mut c_void)),
                WM_CLOSE,
                WPARAM(0),
                LPARAM(0),
            )
        };
    }
}
