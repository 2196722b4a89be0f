//! Live key state fed by raw hook events.

use std::collections::HashSet;

use win_keycode::Vk;

/// Tracks the set of virtual keys currently held down.
///
/// Fed exactly once per physical key transition by the hook callback,
/// after left/right normalization. The set reflects live OS key state and
/// is never cleared wholesale.
#[derive(Debug, Default)]
pub struct KeyStateTracker {
    held: HashSet<Vk>,
}

impl KeyStateTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition. A key-up for a key never seen as down is
    /// a no-op, as is an OS auto-repeat of a held key.
    pub fn on_key_event(&mut self, vk: Vk, down: bool) {
        if down {
            self.held.insert(vk);
        } else {
            self.held.remove(&vk);
        }
    }

    /// True if the key is currently considered down.
    pub fn is_down(&self, vk: Vk) -> bool {
        self.held.contains(&vk)
    }

    /// Read-only view of the currently held keys.
    pub fn held(&self) -> &HashSet<Vk> {
        &self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_transitions() {
        let mut t = KeyStateTracker::new();
        t.on_key_event(Vk::LCONTROL, true);
        t.on_key_event(Vk::F11, true);
        assert!(t.is_down(Vk::LCONTROL));
        assert_eq!(t.held().len(), 2);
        t.on_key_event(Vk::F11, false);
        assert!(!t.is_down(Vk::F11));
        assert_eq!(t.held().len(), 1);
    }

    #[test]
    fn unseen_key_up_is_noop() {
        let mut t = KeyStateTracker::new();
        t.on_key_event(Vk::TAB, false);
        assert!(t.held().is_empty());
    }

    #[test]
    fn repeat_down_is_idempotent() {
        let mut t = KeyStateTracker::new();
        t.on_key_event(Vk::TAB, true);
        t.on_key_event(Vk::TAB, true);
        assert_eq!(t.held().len(), 1);
    }
}
