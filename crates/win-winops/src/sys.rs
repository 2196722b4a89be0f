//! Win32 window enumeration.
//!
//! One pass walks every top-level window plus its descendants and
//! captures the attributes the scorer consumes. The enumeration callback
//! only collects handles; all attribute queries happen afterwards so the
//! callback stays trivially reentrancy-safe.

use std::ffi::c_void;

use tracing::trace;
use windows::Win32::{
    Foundation::{BOOL, HWND, LPARAM, TRUE},
    Graphics::Dwm::{DWMWA_CLOAKED, DwmGetWindowAttribute},
    UI::WindowsAndMessaging::{
        EnumChildWindows, EnumWindows, GA_PARENT, GWL_EXSTYLE, GetAncestor, GetClassNameW,
        GetDesktopWindow, GetWindowLongW, GetWindowTextW, GetWindowThreadProcessId, IsIconic,
        IsWindowVisible,
    },
};

use crate::window::WindowSnapshot;

unsafe extern "system" fn enum_cb(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let vec = unsafe { &mut *(lparam.0 as *mut Vec<isize>) };
    vec.push(hwnd.0 as isize);
    TRUE
}

fn collect_handles() -> Vec<isize> {
    let mut top: Vec<isize> = Vec::new();
    unsafe {
        let _ = EnumWindows(Some(enum_cb), LPARAM(&mut top as *mut Vec<isize> as isize));
    }
    let mut all = Vec::with_capacity(top.len());
    for &raw in &top {
        all.push(raw);
        let mut kids: Vec<isize> = Vec::new();
        unsafe {
            let _ = EnumChildWindows(
                HWND(raw as *mut _),
                Some(enum_cb),
                LPARAM(&mut kids as *mut Vec<isize> as isize),
            );
        }
        all.extend(kids);
    }
    all
}

fn is_cloaked(hwnd: HWND) -> bool {
    let mut cloaked: u32 = 0;
    let ok = unsafe {
        DwmGetWindowAttribute(
            hwnd,
            DWMWA_CLOAKED,
            &mut cloaked as *mut u32 as *mut c_void,
            std::mem::size_of::<u32>() as u32,
        )
    };
    ok.is_ok() && cloaked != 0
}

fn snapshot_for(raw: isize) -> WindowSnapshot {
    let hwnd = HWND(raw as *mut _);
    unsafe {
        let mut class_buf = [0u16; 256];
        let class_len = GetClassNameW(hwnd, &mut class_buf);
        let class_name = String::from_utf16_lossy(&class_buf[..class_len.max(0) as usize]);

        let mut title_buf = [0u16; 512];
        let title_len = GetWindowTextW(hwnd, &mut title_buf);
        let title = String::from_utf16_lossy(&title_buf[..title_len.max(0) as usize]);

        let mut pid: u32 = 0;
        GetWindowThreadProcessId(hwnd, Some(&mut pid));

        let parent = GetAncestor(hwnd, GA_PARENT);
        let desktop = GetDesktopWindow();
        let parent = if parent.0.is_null() || parent == desktop {
            None
        } else {
            Some(parent.0 as isize)
        };

        WindowSnapshot {
            hwnd: raw,
            class_name,
            title,
            pid,
            parent,
            is_visible: IsWindowVisible(hwnd).as_bool(),
            is_minimized: IsIconic(hwnd).as_bool(),
            ex_style: GetWindowLongW(hwnd, GWL_EXSTYLE) as u32,
            cloaked: is_cloaked(hwnd),
        }
    }
}

/// Snapshot every window (top-level and descendants) currently known to
/// the window manager.
pub(crate) fn list_windows() -> Vec<WindowSnapshot> {
    let handles = collect_handles();
    trace!(count = handles.len(), "list_windows");
    handles.into_iter().map(snapshot_for).collect()
}
