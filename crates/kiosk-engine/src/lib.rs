//! Kiosk Engine
//!
//! Coordinates the OS-interaction core of the kiosk shell:
//! - feeds keyboard-hook decisions from configuration (blocking, admin
//!   unlock) and relays unlock events to the UI layer
//! - runs launch-monitoring sessions that poll for a launched
//!   application's main window and activate it
//! - exposes the window-detection read path for manual disambiguation
//!
//! The engine emits facts as [`Notice`] values; all visual feedback is the
//! presentation layer's concern. Construct via [`Engine::new`], then call
//! [`Engine::start`] to install the hook — installation failure degrades
//! key capture but never stops the engine.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use win_hotkey::{Manager, Rules};
use win_winops::{
    DetectionHints, ScoredWindow, find_best_window,
    ops::{WinOps, descendant_pids},
    survey,
};

mod error;
mod launch;
mod notification;

pub use error::{Error, Result};
pub use launch::{FORCE_ATTEMPTS, LaunchMonitor, Timing};
pub use notification::{Notice, NotificationDispatcher};

/// The engine facade owning the hook manager, the launch monitor, and the
/// notice channel to the UI layer.
pub struct Engine {
    manager: Manager,
    monitor: LaunchMonitor,
    notifier: NotificationDispatcher,
    ops: Arc<dyn WinOps>,
    hook_active: bool,
}

impl Engine {
    /// Create a new engine.
    ///
    /// - `ops`: the OS window surface (real on Windows, mock in tests)
    /// - `cfg`: resolved configuration; applied immediately
    /// - `event_tx`: channel for UI notices
    pub fn new(
        ops: Arc<dyn WinOps>,
        cfg: &config::Config,
        event_tx: UnboundedSender<Notice>,
    ) -> Self {
        let notifier = NotificationDispatcher::new(event_tx);

        // Hook events arrive on a plain channel from the pump thread;
        // bridge them onto the notice channel off the callback path.
        let (hook_tx, hook_rx) = crossbeam_channel::unbounded();
        let manager = Manager::new(hook_tx);
        {
            let notifier = notifier.clone();
            tokio::task::spawn_blocking(move || {
                while let Ok(event) = hook_rx.recv() {
                    match event {
                        win_hotkey::Event::AdminUnlock => {
                            let _ = notifier.send_admin_unlock();
                        }
                    }
                }
            });
        }

        let monitor = LaunchMonitor::new(ops.clone(), notifier.clone(), timing_from(cfg));
        let engine = Self {
            manager,
            monitor,
            notifier,
            ops,
            hook_active: false,
        };
        engine.manager.set_rules(rules_from(cfg));
        engine
    }

    /// Install the keyboard hook.
    ///
    /// On failure the engine stays functional without key capture; the
    /// error is reported once here and [`Engine::retry_hook`] re-attempts
    /// on demand.
    pub fn start(&mut self) -> Result<()> {
        match self.manager.start() {
            Ok(()) => {
                self.hook_active = true;
                debug!("keyboard hook active");
                Ok(())
            }
            Err(e) => {
                warn!(err = %e, "keyboard hook unavailable; continuing without key capture");
                Err(e.into())
            }
        }
    }

    /// Re-attempt hook installation after an earlier failure.
    pub fn retry_hook(&mut self) -> Result<()> {
        self.manager.retry_install()?;
        self.hook_active = true;
        Ok(())
    }

    /// True while the hook is installed.
    pub fn hook_active(&self) -> bool {
        self.hook_active && self.manager.is_running()
    }

    /// Apply a (re)loaded configuration: matching rules and scheduler
    /// timing, without disturbing active sessions.
    pub fn apply_config(&self, cfg: &config::Config) {
        self.manager.set_rules(rules_from(cfg));
        self.monitor.set_timing(timing_from(cfg));
    }

    /// Toggle the restricted user mode. Key blocking applies only while
    /// it is active; the admin hotkey is matched in both modes.
    pub fn set_user_mode(&self, active: bool) {
        self.manager.set_user_mode(active);
    }

    /// Current user-mode flag.
    pub fn user_mode(&self) -> bool {
        self.manager.user_mode()
    }

    /// Access the hook manager (tests drive key events through its
    /// callback context).
    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    /// Access the launch monitor.
    pub fn monitor(&self) -> &LaunchMonitor {
        &self.monitor
    }

    /// Begin monitoring a launched application; supersedes any session
    /// for the same path.
    pub fn start_monitoring(
        &self,
        path: &str,
        pid: u32,
        exe_hint: Option<String>,
        hints: DetectionHints,
        force_activate_only: bool,
    ) {
        self.monitor
            .start(path, pid, exe_hint, hints, force_activate_only);
    }

    /// Cancel monitoring for `path` without emitting anything.
    pub fn cancel_monitoring(&self, path: &str) -> bool {
        self.monitor.cancel(path)
    }

    /// Run one synchronous detection pass for `pid` and report the result
    /// to the UI, including every considered window for manual
    /// disambiguation. Finding nothing is a normal outcome, not an error.
    pub fn detect_windows(&self, pid: u32, hints: &DetectionHints) -> Vec<ScoredWindow> {
        let windows = self.ops.list_windows();
        let pids = descendant_pids(pid, self.ops.as_ref());
        let (best, score) = find_best_window(&windows, &pids, hints);
        let rows = survey(&windows, &pids, hints);

        let derived = best
            .and_then(|hwnd| rows.iter().find(|r| r.window.hwnd == hwnd))
            .map(|r| DetectionHints {
                primary_class: r.window.class_name.clone(),
                title_contains: String::new(),
                allow_non_top_level: !r.window.is_top_level() || hints.allow_non_top_level,
                min_score: hints.min_score,
            });
        debug!(pid, ?best, score, considered = rows.len(), "detection_pass");

        let success = best.is_some();
        let error = (!success).then(|| "no qualifying window found".to_string());
        let _ = self.notifier.send(Notice::DetectionCompleted {
            windows: rows.clone(),
            best,
            hints: derived,
            success,
            error,
        });
        rows
    }

    /// Tear down the hook and all monitoring sessions.
    pub fn shutdown(&mut self) {
        self.monitor.shutdown();
        self.manager.stop();
        self.hook_active = false;
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Map resolved configuration onto hook matching rules.
fn rules_from(cfg: &config::Config) -> Rules {
    Rules {
        admin_hotkey: Some(cfg.admin_hotkey.clone()),
        blocked_keys: cfg.blocked_keys.clone(),
        blocked_combinations: cfg.blocked_combinations.clone(),
    }
}

/// Map resolved configuration onto scheduler timing.
fn timing_from(cfg: &config::Config) -> Timing {
    Timing {
        tick: cfg.detection_poll,
        budget: cfg.detection_wait,
    }
}
