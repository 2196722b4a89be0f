//! Best-effort window activation.
//!
//! Windows refuses `SetForegroundWindow` from a background process unless
//! the caller shares input state with the thread that owns the target
//! window. The attach is a scoped resource: the guard detaches on every
//! exit path, including early errors.

use tracing::{debug, warn};
use windows::Win32::{
    Foundation::{FALSE, HWND, TRUE},
    System::Threading::GetCurrentThreadId,
    UI::{
        Input::KeyboardAndMouse::AttachThreadInput,
        WindowsAndMessaging::{
            BringWindowToTop, GetWindowThreadProcessId, IsIconic, IsWindow, SW_RESTORE,
            SetForegroundWindow, ShowWindow,
        },
    },
};

use crate::{
    error::{Error, Result},
    window::WindowId,
};

/// Scoped input-state attachment between the calling thread and the
/// target window's owning thread.
struct InputAttachGuard {
    from: u32,
    to: u32,
    attached: bool,
}

impl InputAttachGuard {
    fn attach(from: u32, to: u32) -> Self {
        let attached = from != to && unsafe { AttachThreadInput(from, to, TRUE).as_bool() };
        Self { from, to, attached }
    }
}

impl Drop for InputAttachGuard {
    fn drop(&mut self) {
        if self.attached {
            unsafe {
                let _ = AttachThreadInput(self.from, self.to, FALSE);
            }
        }
    }
}

/// Bring `hwnd` to the foreground, restoring it first when minimized.
///
/// Idempotent: re-activating an already-foreground window leaves the same
/// end state. Foreground denial is reported but non-fatal; the window is
/// still raised in Z-order.
pub fn activate_window(hwnd: WindowId) -> Result<()> {
    let handle = HWND(hwnd as *mut _);
    unsafe {
        if !IsWindow(handle).as_bool() {
            return Err(Error::WindowGone);
        }
        let target_thread = GetWindowThreadProcessId(handle, None);
        if target_thread == 0 {
            return Err(Error::WindowGone);
        }

        let _attach = InputAttachGuard::attach(GetCurrentThreadId(), target_thread);

        if IsIconic(handle).as_bool() {
            let _ = ShowWindow(handle, SW_RESTORE);
        }
        if let Err(e) = BringWindowToTop(handle) {
            debug!(hwnd, err = %e, "BringWindowToTop failed");
        }
        if !SetForegroundWindow(handle).as_bool() {
            // Focus-stealing prevention can veto this; the attach makes it
            // rare but not impossible.
            warn!(hwnd, "SetForegroundWindow denied");
        }
    }
    Ok(())
}
