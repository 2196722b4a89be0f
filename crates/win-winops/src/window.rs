//! Window snapshot types produced by one enumeration pass.

/// Alias for a raw window handle (HWND as a pointer-sized integer).
pub type WindowId = isize;

/// Extended-style bit marking a window that shows on the taskbar.
pub const WS_EX_APPWINDOW: u32 = 0x0004_0000;

/// Everything the scorer needs to know about one window, captured in a
/// single enumeration pass. Transient; never persisted across ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSnapshot {
    /// Raw handle.
    pub hwnd: WindowId,
    /// Window class name.
    pub class_name: String,
    /// Window title, possibly empty.
    pub title: String,
    /// Owning process id.
    pub pid: u32,
    /// Parent handle; `None` for top-level windows (no parent, or the
    /// parent is the desktop).
    pub parent: Option<WindowId>,
    /// Visibility per the window manager.
    pub is_visible: bool,
    /// True when minimized to the taskbar.
    pub is_minimized: bool,
    /// Raw extended style flags.
    pub ex_style: u32,
    /// True when the compositor cloaks the window (other virtual desktop,
    /// suspended UWP shell, and similar).
    pub cloaked: bool,
}

impl WindowSnapshot {
    /// Top-level means no parent in the snapshot.
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// True when the taskbar-visible extended style bit is set.
    pub fn has_app_window_style(&self) -> bool {
        self.ex_style & WS_EX_APPWINDOW != 0
    }
}

/// Caller-supplied description narrowing which window should win.
///
/// Derived from a prior detection run or stored per whitelisted app;
/// immutable for the duration of one scoring call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionHints {
    /// Expected window class; exact match scores highest, substring
    /// match lower. Empty disables the class rules.
    pub primary_class: String,
    /// Substring expected in the title (case-insensitive). Empty
    /// disables the rule.
    pub title_contains: String,
    /// Whether child windows may qualify at all.
    pub allow_non_top_level: bool,
    /// Minimum qualifying score; `None` selects the built-in default.
    pub min_score: Option<i32>,
}

impl Default for DetectionHints {
    fn default() -> Self {
        Self {
            primary_class: String::new(),
            title_contains: String::new(),
            allow_non_top_level: true,
            min_score: None,
        }
    }
}
