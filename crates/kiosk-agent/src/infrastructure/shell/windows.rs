//! Windows taskbar implementation of [`ShellSurface`].
//!
//! Resolves the `Shell_TrayWnd` window (class name configurable) lazily on
//! the first hide and toggles it with `ShowWindow`.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::ffi::c_void;

use windows::core::PCWSTR;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{FindWindowW, ShowWindow, SW_HIDE, SW_SHOW};

use super::{ShellError, ShellSurface};

/// Windows taskbar surface.
///
/// The window handle is stored as a raw `isize` so the struct stays `Send`;
/// it is only dereferenced by `ShowWindow` on the controller's calling thread.
pub struct WindowsShellSurface {
    /// Window class looked up on first hide (default `Shell_TrayWnd`).
    window_class: String,
    /// Cached raw handle value, set only after a successful lookup.
    hwnd: Option<isize>,
    /// `true` while this instance has the taskbar hidden.
    hidden: bool,
}

impl WindowsShellSurface {
    /// Creates a surface that resolves `window_class` on first use.
    pub fn new(window_class: impl Into<String>) -> Self {
        Self {
            window_class: window_class.into(),
            hwnd: None,
            hidden: false,
        }
    }

    /// Resolves and caches the taskbar handle, or returns the cached one.
    fn resolve(&mut self) -> Result<isize, ShellError> {
        if let Some(raw) = self.hwnd {
            return Ok(raw);
        }

        let wide: Vec<u16> = self
            .window_class
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect();

        // SAFETY: `wide` is a valid NUL-terminated UTF-16 string that outlives
        // the call; a null window-name PCWSTR matches any window of the class.
        let hwnd = unsafe { FindWindowW(PCWSTR(wide.as_ptr()), PCWSTR::null()) };

        match hwnd {
            Ok(h) if !h.0.is_null() => {
                let raw = h.0 as isize;
                self.hwnd = Some(raw);
                Ok(raw)
            }
            _ => Err(ShellError::SurfaceNotFound {
                class: self.window_class.clone(),
            }),
        }
    }
}

impl ShellSurface for WindowsShellSurface {
    fn hide(&mut self) -> Result<(), ShellError> {
        if self.hidden {
            return Ok(());
        }
        let raw = self.resolve()?;

        // SAFETY: the handle was produced by FindWindowW; ShowWindow tolerates
        // a stale handle (the call simply fails without faulting).
        let _ = unsafe { ShowWindow(HWND(raw as *mut c_void), SW_HIDE) };
        self.hidden = true;
        Ok(())
    }

    fn show(&mut self) -> Result<(), ShellError> {
        // Never hidden by this instance: nothing to restore.
        let Some(raw) = self.hwnd else {
            self.hidden = false;
            return Ok(());
        };

        // SAFETY: see `hide`.
        let _ = unsafe { ShowWindow(HWND(raw as *mut c_void), SW_SHOW) };
        self.hidden = false;
        Ok(())
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }
}
