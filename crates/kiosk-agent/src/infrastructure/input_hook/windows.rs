//! Windows `WH_KEYBOARD_LL` implementation of [`KeyboardFilter`].
//!
//! The hook is installed from a dedicated Win32 message-loop thread (a
//! low-level hook requires its installing thread to pump messages).
//! Uninstall posts `WM_QUIT` to that thread and joins it; the hook handle is
//! released by the thread itself on the way out.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};

use kiosk_core::keys::{VK_CONTROL, VK_MENU};
use kiosk_core::{EscapeKeyPolicy, FilterDecision, KeyEvent, ModifierKeys};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
    UnhookWindowsHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT, MSG, WH_KEYBOARD_LL, WM_QUIT,
};

use super::{HookError, KeyboardFilter};

/// Data the hook callback reads on every event.
///
/// The callback is a free `extern "system"` function and cannot capture
/// state, so the policy and the live active flag are published through a
/// process-wide `OnceLock`.  Reads are lock-free: the policy is immutable
/// after publication and the flag is atomic.
struct FilterShared {
    active: Arc<AtomicBool>,
    policy: EscapeKeyPolicy,
}

/// Set on the first install; the Arc identity persists across
/// uninstall/reinstall cycles within the same process.
static FILTER_SHARED: OnceLock<FilterShared> = OnceLock::new();

/// Windows low-level keyboard filter.
pub struct WindowsKeyboardFilter {
    active: Arc<AtomicBool>,
    policy: EscapeKeyPolicy,
    /// Message-loop thread; present only while the hook is installed.
    loop_thread: Option<JoinHandle<()>>,
    /// Win32 thread id of the message loop, for posting `WM_QUIT`.
    loop_thread_id: u32,
}

impl WindowsKeyboardFilter {
    /// Creates an (uninstalled) filter sharing `active` with the controller.
    pub fn new(active: Arc<AtomicBool>, policy: EscapeKeyPolicy) -> Self {
        Self {
            active,
            policy,
            loop_thread: None,
            loop_thread_id: 0,
        }
    }
}

impl KeyboardFilter for WindowsKeyboardFilter {
    fn install(&mut self) -> Result<(), HookError> {
        if self.loop_thread.is_some() {
            return Ok(());
        }

        // Publish the callback's inputs.  A second publication attempt after
        // an uninstall/reinstall cycle is fine: the flag Arc and policy are
        // the same values the first install published.
        let _ = FILTER_SHARED.set(FilterShared {
            active: Arc::clone(&self.active),
            policy: self.policy.clone(),
        });

        // The spawning call blocks until the loop thread reports whether the
        // hook registration itself succeeded.
        let (tx, rx) = mpsc::channel::<Result<u32, String>>();

        let handle = thread::Builder::new()
            .name("kiosk-hook-loop".to_string())
            .spawn(move || run_filter_message_loop(tx))
            .map_err(|e| HookError::InstallFailed(e.to_string()))?;

        match rx.recv() {
            Ok(Ok(thread_id)) => {
                self.loop_thread = Some(handle);
                self.loop_thread_id = thread_id;
                Ok(())
            }
            Ok(Err(msg)) => {
                // Registration failed; the thread has already exited.
                let _ = handle.join();
                Err(HookError::InstallFailed(msg))
            }
            Err(_) => {
                let _ = handle.join();
                Err(HookError::InstallFailed(
                    "hook thread exited before reporting".to_string(),
                ))
            }
        }
    }

    fn uninstall(&mut self) -> Result<(), HookError> {
        let Some(handle) = self.loop_thread.take() else {
            return Ok(());
        };

        // SAFETY: posting WM_QUIT to a known live thread id; failure only
        // means the loop is already gone, which the join below confirms.
        let posted = unsafe {
            PostThreadMessageW(self.loop_thread_id, WM_QUIT, WPARAM(0), LPARAM(0))
        };
        if let Err(e) = posted {
            // The loop thread may have died on its own; still join it.
            let _ = handle.join();
            self.loop_thread_id = 0;
            return Err(HookError::UninstallFailed(e.to_string()));
        }

        handle
            .join()
            .map_err(|_| HookError::UninstallFailed("hook thread panicked".to_string()))?;
        self.loop_thread_id = 0;
        Ok(())
    }

    fn is_installed(&self) -> bool {
        self.loop_thread.is_some()
    }
}

impl Drop for WindowsKeyboardFilter {
    fn drop(&mut self) {
        // Best effort: no hook may outlive its owning filter.
        let _ = self.uninstall();
    }
}

/// Entry point for the dedicated Win32 message-loop thread.
///
/// Reports the registration outcome (and this thread's id) through `ready`,
/// then pumps messages until `WM_QUIT` arrives.
fn run_filter_message_loop(ready: mpsc::Sender<Result<u32, String>>) {
    // SAFETY: SetWindowsHookExW requires the calling thread to have a message
    // loop, which this thread enters immediately after registration.
    let hook: HHOOK = match unsafe {
        SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_filter_proc), None, 0)
    } {
        Ok(h) => h,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    // SAFETY: trivially safe; returns the current thread's Win32 id.
    let thread_id = unsafe { GetCurrentThreadId() };
    let _ = ready.send(Ok(thread_id));

    // Win32 message loop – blocks until WM_QUIT is posted by uninstall().
    let mut msg = MSG::default();
    // SAFETY: standard GetMessage/DispatchMessage loop pattern.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            DispatchMessageW(&msg);
        }
        let _ = UnhookWindowsHookEx(hook);
    }
}

/// Returns `true` if the given virtual key is currently held down.
fn key_held(vk: u8) -> bool {
    // SAFETY: GetAsyncKeyState has no preconditions; the high bit reports
    // the current down state.
    (unsafe { GetAsyncKeyState(vk as i32) } as u16 & 0x8000) != 0
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// Called by Windows from the hook message-loop thread.  Must return quickly
/// and must not block, allocate, or take locks: it reads only the published
/// policy (immutable) and the atomic active flag.
unsafe extern "system" fn keyboard_filter_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 {
        // SAFETY: Must call CallNextHookEx when n_code < 0.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    if let Some(shared) = FILTER_SHARED.get() {
        // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
        let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);

        let event = KeyEvent {
            vk_code: kbs.vkCode as u8,
            modifiers: ModifierKeys {
                ctrl: key_held(VK_CONTROL),
                alt: key_held(VK_MENU),
            },
        };

        // The flag is read per event, never captured at install time.
        let active = shared.active.load(Ordering::SeqCst);
        if shared.policy.decide(event, active) == FilterDecision::Suppress {
            // Consume the event: do not call CallNextHookEx.
            return LRESULT(1);
        }
    }

    // SAFETY: forward the event to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}
