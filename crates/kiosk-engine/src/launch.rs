//! Launch monitoring: one polling session per launched application.
//!
//! Sessions live in a single map keyed by application path and are driven
//! by one shared scheduler task, so cancellation and replacement are plain
//! map operations. Each tick is a short, non-blocking pass: refresh the
//! process tree, enumerate, score, maybe activate. Notices are emitted
//! while the sessions lock is held, which makes the cancellation guarantee
//! structural: once `cancel` (or a superseding `start`) returns, no notice
//! for the old session can be observed.

use std::{
    collections::HashMap,
    sync::Arc,
    time::Duration,
};

use parking_lot::Mutex;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use win_winops::{
    DetectionHints, find_best_window,
    ops::{WinOps, descendant_pids},
};

use crate::notification::NotificationDispatcher;

/// Attempt budget when the application is already expected to be running
/// and only needs its window brought forward.
pub const FORCE_ATTEMPTS: u32 = 2;

/// Scheduler timing; both values are configuration-driven.
#[derive(Clone, Copy, Debug)]
pub struct Timing {
    /// Interval between detection attempts.
    pub tick: Duration,
    /// Total budget for a fresh-launch session.
    pub budget: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(300),
            budget: Duration::from_millis(5000),
        }
    }
}

impl Timing {
    /// Attempts a fresh-launch session gets before timing out.
    fn attempts(&self) -> u32 {
        let ticks = self.budget.as_millis() / self.tick.as_millis().max(1);
        (ticks as u32).max(1)
    }
}

/// One monitoring session. `Idle -> Polling -> {Activated | TimedOut |
/// Cancelled}`; the session exists only while polling.
struct Session {
    pid: u32,
    exe_hint: Option<String>,
    hints: DetectionHints,
    attempts_left: u32,
}

struct Driver {
    token: CancellationToken,
    _handle: tokio::task::JoinHandle<()>,
}

struct Inner {
    ops: Arc<dyn WinOps>,
    notifier: NotificationDispatcher,
    sessions: Mutex<HashMap<String, Session>>,
    timing: Mutex<Timing>,
    driver: Mutex<Option<Driver>>,
}

/// Orchestrates polling sessions for launched applications.
#[derive(Clone)]
pub struct LaunchMonitor {
    inner: Arc<Inner>,
}

impl LaunchMonitor {
    /// Create a monitor over the given OS surface. The shared scheduler
    /// task starts with the first session.
    pub fn new(ops: Arc<dyn WinOps>, notifier: NotificationDispatcher, timing: Timing) -> Self {
        Self {
            inner: Arc::new(Inner {
                ops,
                notifier,
                sessions: Mutex::new(HashMap::new()),
                timing: Mutex::new(timing),
                driver: Mutex::new(None),
            }),
        }
    }

    /// Begin (or restart) monitoring for `path`.
    ///
    /// An existing session for the same path is superseded silently: the
    /// at-most-one-session invariant is a map insert. `force_activate_only`
    /// shrinks the budget to [`FORCE_ATTEMPTS`] quick attempts, for
    /// applications already known to be running.
    pub fn start(
        &self,
        path: &str,
        pid: u32,
        exe_hint: Option<String>,
        hints: DetectionHints,
        force_activate_only: bool,
    ) {
        let timing = *self.inner.timing.lock();
        let attempts_left = if force_activate_only {
            FORCE_ATTEMPTS
        } else {
            timing.attempts()
        };
        {
            let mut sessions = self.inner.sessions.lock();
            let session = Session {
                pid,
                exe_hint,
                hints,
                attempts_left,
            };
            if sessions.insert(path.to_string(), session).is_some() {
                debug!(path, "superseding existing session");
            }
        }
        debug!(path, pid, attempts_left, force_activate_only, "session_start");
        self.ensure_driver();
    }

    /// Discard the session for `path`, if any. Emits nothing; cancelling
    /// a nonexistent session is a no-op.
    pub fn cancel(&self, path: &str) -> bool {
        let removed = self.inner.sessions.lock().remove(path).is_some();
        if removed {
            debug!(path, "session_cancelled");
        }
        removed
    }

    /// True while a session for `path` is polling.
    pub fn is_polling(&self, path: &str) -> bool {
        self.inner.sessions.lock().contains_key(path)
    }

    /// Number of active sessions.
    pub fn session_count(&self) -> usize {
        self.inner.sessions.lock().len()
    }

    /// Replace the scheduler timing. Applies to new sessions; a running
    /// driver is restarted at the new tick interval.
    pub fn set_timing(&self, timing: Timing) {
        *self.inner.timing.lock() = timing;
        let mut driver = self.inner.driver.lock();
        if let Some(d) = driver.take() {
            d.token.cancel();
            *driver = Some(spawn_driver(self.inner.clone()));
        }
    }

    /// Stop the scheduler and discard all sessions without notices.
    pub fn shutdown(&self) {
        if let Some(d) = self.inner.driver.lock().take() {
            d.token.cancel();
        }
        self.inner.sessions.lock().clear();
    }

    fn ensure_driver(&self) {
        let mut driver = self.inner.driver.lock();
        if driver.is_none() {
            *driver = Some(spawn_driver(self.inner.clone()));
        }
    }
}

fn spawn_driver(inner: Arc<Inner>) -> Driver {
    let token = CancellationToken::new();
    let cancel = token.clone();
    let tick_len = inner.timing.lock().tick;
    let handle = tokio::spawn(async move {
        let mut ticker = time::interval(tick_len);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => tick(&inner),
            }
        }
    });
    Driver {
        token,
        _handle: handle,
    }
}

/// One pass over every session: enumerate once, score each session's
/// process tree, finish sessions that activated or ran out of budget.
fn tick(inner: &Inner) {
    let mut sessions = inner.sessions.lock();
    if sessions.is_empty() {
        return;
    }
    let windows = inner.ops.list_windows();
    let mut finished: Vec<String> = Vec::new();

    for (path, session) in sessions.iter_mut() {
        let mut pids = descendant_pids(session.pid, inner.ops.as_ref());
        if let Some(image) = &session.exe_hint {
            pids.extend(inner.ops.pids_for_image(image));
        }

        session.attempts_left = session.attempts_left.saturating_sub(1);
        let (best, score) = find_best_window(&windows, &pids, &session.hints);

        match best {
            Some(hwnd) => match inner.ops.activate(hwnd) {
                Ok(()) => {
                    debug!(path, hwnd, score, "window_activated");
                    let _ = inner.notifier.send_activated(path);
                    finished.push(path.clone());
                }
                Err(e) => {
                    warn!(path, hwnd, err = %e, "activation attempt failed");
                    if session.attempts_left == 0 {
                        let _ = inner
                            .notifier
                            .send_activation_failed(path, format!("activation failed: {e}"));
                        finished.push(path.clone());
                    }
                }
            },
            None => {
                trace!(path, remaining = session.attempts_left, "no qualifying window");
                if session.attempts_left == 0 {
                    let _ = inner.notifier.send_activation_failed(
                        path,
                        "no matching window within the detection budget".into(),
                    );
                    finished.push(path.clone());
                }
            }
        }
    }

    for path in finished {
        sessions.remove(&path);
    }
}
