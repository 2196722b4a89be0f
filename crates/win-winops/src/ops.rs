//! Trait abstraction over the native window surface to improve
//! testability. Real calls are Windows-only; the mock stands in
//! everywhere else.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{
    Result as WinResult,
    error::Error,
    window::{WindowId, WindowSnapshot},
};

/// The OS surface the engine consumes: enumeration, activation, and
/// process-tree queries. One call's OS work stays on the calling thread.
pub trait WinOps: Send + Sync {
    /// Snapshot every window currently known to the window manager.
    fn list_windows(&self) -> Vec<WindowSnapshot>;
    /// Bring a window to the foreground, restoring it if minimized.
    fn activate(&self, hwnd: WindowId) -> WinResult<()>;
    /// True while the process exists.
    fn process_alive(&self, pid: u32) -> bool;
    /// Direct children of the process.
    fn child_pids(&self, pid: u32) -> Vec<u32>;
    /// Processes whose executable image matches `image`
    /// (case-insensitive).
    fn pids_for_image(&self, image: &str) -> Vec<u32>;
}

/// Production implementation delegating to the Win32 surface.
#[cfg(windows)]
pub struct RealWinOps;

#[cfg(windows)]
impl WinOps for RealWinOps {
    fn list_windows(&self) -> Vec<WindowSnapshot> {
        crate::sys::list_windows()
    }
    fn activate(&self, hwnd: WindowId) -> WinResult<()> {
        crate::activate::activate_window(hwnd)
    }
    fn process_alive(&self, pid: u32) -> bool {
        crate::process::process_alive(pid)
    }
    fn child_pids(&self, pid: u32) -> Vec<u32> {
        crate::process::child_pids(pid)
    }
    fn pids_for_image(&self, image: &str) -> Vec<u32> {
        crate::process::pids_for_image(image)
    }
}

/// Mock implementation for tests: windows, process tree, and activation
/// outcomes are scripted; calls are logged.
#[derive(Clone, Default)]
pub struct MockWinOps {
    windows: Arc<Mutex<Vec<WindowSnapshot>>>,
    children: Arc<Mutex<HashMap<u32, Vec<u32>>>>,
    alive: Arc<Mutex<HashSet<u32>>>,
    images: Arc<Mutex<HashMap<String, Vec<u32>>>>,
    activated: Arc<Mutex<Vec<WindowId>>>,
    fail_activate: Arc<AtomicBool>,
}

impl MockWinOps {
    /// Fresh mock with no windows and no live processes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the enumerable window set.
    pub fn set_windows(&self, wins: Vec<WindowSnapshot>) {
        *self.windows.lock() = wins;
    }

    /// Mark a process as alive.
    pub fn add_process(&self, pid: u32) {
        self.alive.lock().insert(pid);
    }

    /// Script the children of `pid`.
    pub fn set_children(&self, pid: u32, kids: Vec<u32>) {
        self.children.lock().insert(pid, kids);
    }

    /// Script the processes running `image`.
    pub fn set_image_pids(&self, image: &str, pids: Vec<u32>) {
        self.images.lock().insert(image.to_lowercase(), pids);
    }

    /// Make subsequent activations fail.
    pub fn set_fail_activate(&self, v: bool) {
        self.fail_activate.store(v, Ordering::SeqCst);
    }

    /// Handles passed to `activate`, in call order.
    pub fn activations(&self) -> Vec<WindowId> {
        self.activated.lock().clone()
    }
}

impl WinOps for MockWinOps {
    fn list_windows(&self) -> Vec<WindowSnapshot> {
        self.windows.lock().clone()
    }
    fn activate(&self, hwnd: WindowId) -> WinResult<()> {
        self.activated.lock().push(hwnd);
        if self.fail_activate.load(Ordering::SeqCst) {
            return Err(Error::ActivationFailed("mock".into()));
        }
        Ok(())
    }
    fn process_alive(&self, pid: u32) -> bool {
        self.alive.lock().contains(&pid)
    }
    fn child_pids(&self, pid: u32) -> Vec<u32> {
        self.children.lock().get(&pid).cloned().unwrap_or_default()
    }
    fn pids_for_image(&self, image: &str) -> Vec<u32> {
        self.images
            .lock()
            .get(&image.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}

/// Collect `root` plus every live descendant, breadth-first.
///
/// A launcher process often hands off to a child before its window ever
/// appears, so scoring always runs against the whole tree.
pub fn descendant_pids(root: u32, ops: &dyn WinOps) -> HashSet<u32> {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut queue = vec![root];
    while let Some(pid) = queue.pop() {
        if !seen.insert(pid) {
            continue;
        }
        for child in ops.child_pids(pid) {
            if !seen.contains(&child) {
                queue.push(child);
            }
        }
    }
    seen
}
