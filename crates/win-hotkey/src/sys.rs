//! Win32 low-level keyboard hook and message pump.
//!
//! WH_KEYBOARD_LL gives us a plain function pointer with no instance
//! parameter, so the callback reaches its state through a single managed
//! process-wide slot ([`HOOK_CTX`]). Suppression follows the hook
//! contract: returning a non-zero LRESULT swallows the event; anything
//! else must be forwarded with `CallNextHookEx`. The callback has a hard
//! OS latency budget (Windows silently unhooks slow hooks), so its body
//! is bounded: one flag check, one normalization, one classification.

use std::{
    sync::atomic::{AtomicIsize, Ordering},
    thread,
};

use crossbeam_channel::bounded;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};
use win_keycode::Vk;
use windows::Win32::{
    Foundation::{LPARAM, LRESULT, WPARAM},
    System::{LibraryLoader::GetModuleHandleW, Threading::GetCurrentThreadId},
    UI::{
        Input::KeyboardAndMouse::{MAPVK_VSC_TO_VK_EX, MapVirtualKeyW},
        WindowsAndMessaging::{
            CallNextHookEx, DispatchMessageW, GetMessageW, HHOOK, KBDLLHOOKSTRUCT,
            LLKHF_EXTENDED, LLKHF_INJECTED, MSG, PostThreadMessageW, SetWindowsHookExW,
            TranslateMessage, UnhookWindowsHookEx, WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP,
            WM_QUIT, WM_SYSKEYDOWN, WM_SYSKEYUP,
        },
    },
};

use crate::{CallbackCtx, Decision, Error, Result};

/// The one context slot the hook callback reads. Set for the lifetime of
/// the pump thread, cleared on teardown.
static HOOK_CTX: Lazy<Mutex<Option<CallbackCtx>>> = Lazy::new(|| Mutex::new(None));

/// Installed hook handle, for `CallNextHookEx` and teardown.
static KB_HOOK: AtomicIsize = AtomicIsize::new(0);

/// Handle to a running pump thread.
pub(crate) struct PumpHandle {
    thread_id: u32,
    join: thread::JoinHandle<()>,
}

impl PumpHandle {
    /// Post WM_QUIT to the pump thread and join it; the hook is
    /// uninstalled on the way out.
    pub(crate) fn stop(self) {
        unsafe {
            let _ = PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
        }
        if self.join.join().is_err() {
            warn!("hook pump thread panicked during shutdown");
        }
    }
}

/// Spawn the pump thread and block until the hook is installed or
/// installation fails.
pub(crate) fn spawn_pump(ctx: CallbackCtx) -> Result<PumpHandle> {
    let (ready_tx, ready_rx) = bounded::<Result<u32>>(1);
    let join = thread::Builder::new()
        .name("kb-hook".into())
        .spawn(move || run_event_loop(ctx, &ready_tx))
        .map_err(|e| Error::OsError(e.to_string()))?;

    match ready_rx.recv() {
        Ok(Ok(thread_id)) => Ok(PumpHandle { thread_id, join }),
        Ok(Err(e)) => {
            let _ = join.join();
            Err(e)
        }
        Err(_) => {
            let _ = join.join();
            Err(Error::OsError("hook thread exited before ready".into()))
        }
    }
}

fn run_event_loop(ctx: CallbackCtx, ready: &crossbeam_channel::Sender<Result<u32>>) {
    *HOOK_CTX.lock() = Some(ctx);

    let hinst = match unsafe { GetModuleHandleW(None) } {
        Ok(h) => h,
        Err(e) => {
            *HOOK_CTX.lock() = None;
            let _ = ready.send(Err(Error::OsError(e.to_string())));
            return;
        }
    };
    let hook = match unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(kb_hook_proc), hinst, 0) } {
        Ok(h) => h,
        Err(e) => {
            *HOOK_CTX.lock() = None;
            let _ = ready.send(Err(Error::HookInstall(e.to_string())));
            return;
        }
    };
    KB_HOOK.store(hook.0 as isize, Ordering::SeqCst);
    debug!("keyboard hook installed");
    let _ = ready.send(Ok(unsafe { GetCurrentThreadId() }));

    let mut msg = MSG::default();
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).into() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    unsafe {
        let _ = UnhookWindowsHookEx(hook);
    }
    KB_HOOK.store(0, Ordering::SeqCst);
    *HOOK_CTX.lock() = None;
    debug!("keyboard hook removed");
}

/// Map the raw delivery onto a specific virtual key.
///
/// The low-level hook reports the generic code for Ctrl/Alt/Shift; the
/// extended-key flag disambiguates right Ctrl/Alt, and the scan code maps
/// left/right Shift.
fn normalize_vk(vk: u16, scan: u32, extended: bool) -> Vk {
    match Vk(vk) {
        Vk::SHIFT => {
            let mapped = unsafe { MapVirtualKeyW(scan, MAPVK_VSC_TO_VK_EX) } as u16;
            if mapped == 0 { Vk::LSHIFT } else { Vk(mapped) }
        }
        Vk::CONTROL => {
            if extended {
                Vk::RCONTROL
            } else {
                Vk::LCONTROL
            }
        }
        Vk::MENU => {
            if extended {
                Vk::RMENU
            } else {
                Vk::LMENU
            }
        }
        other => other,
    }
}

/// Low-level keyboard hook callback.
unsafe extern "system" fn kb_hook_proc(code: i32, wp: WPARAM, lp: LPARAM) -> LRESULT {
    let hook = HHOOK(KB_HOOK.load(Ordering::SeqCst) as *mut _);

    // Negative code = must pass through per the hook contract.
    if code < 0 {
        return unsafe { CallNextHookEx(hook, code, wp, lp) };
    }

    let kbd = unsafe { &*(lp.0 as *const KBDLLHOOKSTRUCT) };

    // Synthetic events (our own or other software's) are never matched.
    if kbd.flags.0 & LLKHF_INJECTED.0 != 0 {
        return unsafe { CallNextHookEx(hook, code, wp, lp) };
    }

    let msg = wp.0 as u32;
    let down = matches!(msg, WM_KEYDOWN | WM_SYSKEYDOWN);
    if !down && !matches!(msg, WM_KEYUP | WM_SYSKEYUP) {
        return unsafe { CallNextHookEx(hook, code, wp, lp) };
    }

    let vk = normalize_vk(
        kbd.vkCode as u16,
        kbd.scanCode,
        kbd.flags.0 & LLKHF_EXTENDED.0 != 0,
    );

    let decision = match HOOK_CTX.lock().as_ref() {
        Some(ctx) => ctx.handle_key(vk, down),
        None => Decision::default(),
    };

    if decision.suppress {
        trace!(vk = %vk, down, "event_suppressed");
        return LRESULT(1);
    }
    unsafe { CallNextHookEx(hook, code, wp, lp) }
}
