//! win-hotkey: global low-level keyboard hook for the kiosk engine.
//!
//! Installs a process-wide WH_KEYBOARD_LL hook on a dedicated message-pump
//! thread, tracks the live pressed-key set, and decides per event whether
//! to suppress it and/or schedule an admin-unlock notification. The hook
//! callback runs synchronously inside the OS input path; its entire body
//! is set updates, comparisons, and one non-blocking channel send.
//!
//! This crate is Windows-only by design; the decision core ([`policy`])
//! and the tracker are portable and drive the hook through
//! [`CallbackCtx::handle_key`], which tests exercise directly.

use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use tracing::{debug, warn};

mod error;
pub mod policy;
mod state;
#[cfg(windows)]
mod sys;

pub use error::{Error, Result};
pub use policy::{Decision, Rules};
pub use state::KeyStateTracker;
use win_keycode::Vk;

/// Events delivered from the hook thread to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The admin-unlock combination was completed.
    AdminUnlock,
}

/// Mutable state shared with the hook callback.
struct Inner {
    /// Live pressed-key set; updated before any matching runs.
    tracker: KeyStateTracker,
    /// Current matching rules.
    rules: Rules,
    /// True while the restricted user mode is active.
    user_mode: bool,
}

/// Context handed to the hook callback through the single process-wide
/// service slot. Cheap to clone; all state lives behind one mutex that is
/// only ever contended between the pump thread and rule updates.
#[derive(Clone)]
pub struct CallbackCtx {
    inner: Arc<Mutex<Inner>>,
    events: Sender<Event>,
}

impl CallbackCtx {
    /// Apply one key transition and decide its fate.
    ///
    /// Updates the tracker first so the key's own press is visible to the
    /// matcher, then classifies, then emits the unlock event without
    /// blocking. Returns the decision so the caller can suppress.
    ///
    /// OS auto-repeats (a down for an already-held key) are not physical
    /// transitions: they still suppress, but never re-fire the unlock.
    pub fn handle_key(&self, vk: Vk, down: bool) -> Decision {
        let decision = {
            let mut inner = self.inner.lock();
            let repeat = down && inner.tracker.is_down(vk);
            inner.tracker.on_key_event(vk, down);
            let mut d =
                policy::classify(inner.tracker.held(), vk, down, &inner.rules, inner.user_mode);
            if repeat {
                d.fire_admin_unlock = false;
            }
            d
        };
        if decision.fire_admin_unlock {
            debug!("admin_unlock_detected");
            if self.events.send(Event::AdminUnlock).is_err() {
                warn!("admin unlock event dropped: receiver gone");
            }
        }
        decision
    }
}

/// Owns the hook lifecycle: install, degrade on failure, explicit retry,
/// and teardown. One instance exists per process (the hook callback is a
/// plain function pointer and reaches its state through a single managed
/// slot); all other components receive this service by injection.
pub struct Manager {
    ctx: CallbackCtx,
    #[cfg(windows)]
    pump: Option<sys::PumpHandle>,
}

impl Manager {
    /// Create a manager that reports events on `events`. The hook is not
    /// installed until [`Manager::start`].
    pub fn new(events: Sender<Event>) -> Self {
        Self {
            ctx: CallbackCtx {
                inner: Arc::new(Mutex::new(Inner {
                    tracker: KeyStateTracker::new(),
                    rules: Rules::default(),
                    user_mode: true,
                })),
                events,
            },
            #[cfg(windows)]
            pump: None,
        }
    }

    /// Replace the matching rules.
    pub fn set_rules(&self, rules: Rules) {
        self.ctx.inner.lock().rules = rules;
    }

    /// Toggle the restricted user mode. Blocking applies only while the
    /// user mode is active; the admin hotkey is matched in both modes.
    pub fn set_user_mode(&self, active: bool) {
        self.ctx.inner.lock().user_mode = active;
        debug!(active, "user_mode");
    }

    /// Current user-mode flag.
    pub fn user_mode(&self) -> bool {
        self.ctx.inner.lock().user_mode
    }

    /// Borrow the callback context (tests drive events through this).
    pub fn ctx(&self) -> &CallbackCtx {
        &self.ctx
    }

    /// Install the hook and start the message pump thread.
    ///
    /// Blocks until the hook is installed or installation fails. Failure
    /// leaves the manager stopped; the caller reports once and may call
    /// [`Manager::retry_install`] later — the engine keeps running without
    /// key capture in the meantime.
    #[cfg(windows)]
    pub fn start(&mut self) -> Result<()> {
        if self.pump.is_some() {
            return Err(Error::AlreadyRunning);
        }
        let pump = sys::spawn_pump(self.ctx.clone())?;
        self.pump = Some(pump);
        Ok(())
    }

    /// See the Windows variant; on other platforms there is no global
    /// keyboard hook and the engine runs degraded.
    #[cfg(not(windows))]
    pub fn start(&mut self) -> Result<()> {
        Err(Error::Unsupported)
    }

    /// Re-attempt hook installation after an earlier failure.
    pub fn retry_install(&mut self) -> Result<()> {
        #[cfg(windows)]
        if self.pump.is_some() {
            return Ok(());
        }
        self.start()
    }

    /// True while the hook is installed and pumping.
    pub fn is_running(&self) -> bool {
        #[cfg(windows)]
        {
            self.pump.is_some()
        }
        #[cfg(not(windows))]
        {
            false
        }
    }

    /// Uninstall the hook and stop the pump thread.
    pub fn stop(&mut self) {
        #[cfg(windows)]
        if let Some(pump) = self.pump.take() {
            pump.stop();
        }
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use win_keycode::KeySequence;

    use super::*;

    fn manager_with_rules(rules: Rules) -> (Manager, crossbeam_channel::Receiver<Event>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mgr = Manager::new(tx);
        mgr.set_rules(rules);
        (mgr, rx)
    }

    #[test]
    fn unlock_event_is_emitted_once_per_fire() {
        let rules = Rules {
            admin_hotkey: Some(KeySequence::parse("ctrl+shift+alt+l").unwrap()),
            ..Rules::default()
        };
        let (mgr, rx) = manager_with_rules(rules);
        let l = Vk::from_spec("l").unwrap();
        for vk in [Vk::LCONTROL, Vk::LSHIFT, Vk::LMENU] {
            assert_eq!(mgr.ctx().handle_key(vk, true), Decision::default());
        }
        let d = mgr.ctx().handle_key(l, true);
        assert!(d.suppress && d.fire_admin_unlock);
        assert_eq!(rx.try_recv(), Ok(Event::AdminUnlock));
        assert!(rx.try_recv().is_err());

        // An auto-repeat of the held trigger does not re-fire.
        let d = mgr.ctx().handle_key(l, true);
        assert!(d.suppress && !d.fire_admin_unlock);
        assert!(rx.try_recv().is_err());

        // Releasing and re-pressing the trigger fires again.
        mgr.ctx().handle_key(l, false);
        mgr.ctx().handle_key(l, true);
        assert_eq!(rx.try_recv(), Ok(Event::AdminUnlock));
    }

    #[test]
    fn mode_toggle_gates_blocking() {
        let rules = Rules {
            blocked_keys: [Vk::F11].into_iter().collect(),
            ..Rules::default()
        };
        let (mgr, _rx) = manager_with_rules(rules);
        assert!(mgr.ctx().handle_key(Vk::F11, true).suppress);
        mgr.ctx().handle_key(Vk::F11, false);

        mgr.set_user_mode(false);
        assert!(!mgr.ctx().handle_key(Vk::F11, true).suppress);
    }

    #[test]
    fn tracker_updates_precede_matching() {
        // A one-key hotkey must fire on its own down-event: the press is
        // visible to the matcher within the same callback.
        let rules = Rules {
            admin_hotkey: Some(KeySequence::parse("f9").unwrap()),
            ..Rules::default()
        };
        let (mgr, rx) = manager_with_rules(rules);
        let d = mgr.ctx().handle_key(Vk::F9, true);
        assert!(d.fire_admin_unlock);
        assert_eq!(rx.try_recv(), Ok(Event::AdminUnlock));
    }
}
