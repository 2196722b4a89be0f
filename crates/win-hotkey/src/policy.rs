//! Pure suppress/unlock decisions for hook events.
//!
//! The hook callback delegates every key event here after updating the key
//! state tracker, so a key's own press is already visible when its fate is
//! decided. Everything in this module is allocation-free and bounded; the
//! callback must never block.

use std::collections::HashSet;

use win_keycode::{KeySequence, Modifier, Vk};

/// Matching rules consulted on every key-down.
#[derive(Clone, Debug, Default)]
pub struct Rules {
    /// The admin-unlock combination. Always checked, regardless of mode;
    /// it is the only path out of a locked session.
    pub admin_hotkey: Option<KeySequence>,
    /// Individually suppressed keys (user mode only).
    pub blocked_keys: HashSet<Vk>,
    /// Suppressed combinations (user mode only).
    pub blocked_combinations: Vec<KeySequence>,
}

/// Outcome of classifying one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decision {
    /// Swallow the event before it reaches the foreground application.
    pub suppress: bool,
    /// Schedule an asynchronous admin-unlock notification.
    pub fire_admin_unlock: bool,
}

/// Classify a key event against the rules.
///
/// `held` is the pressed-key set *after* this event was applied. Key-up
/// events never suppress and never fire. The admin hotkey fires only when
/// the pressed key is its trigger, every modifier component is satisfied,
/// and no extra keys are held (`held.len()` equals the component count) —
/// holding a superset must never unlock. Blocked combinations use the same
/// exact-size rule so a larger unrelated combination that merely contains
/// a blocked subset is not over-suppressed.
pub fn classify(held: &HashSet<Vk>, vk: Vk, down: bool, rules: &Rules, user_mode: bool) -> Decision {
    if !down {
        return Decision::default();
    }

    let mut d = Decision::default();

    if let Some(hotkey) = &rules.admin_hotkey
        && let Some(trigger) = hotkey.trigger()
        && vk == trigger
        && held.len() == hotkey.len()
        && hotkey.satisfied_by(held)
    {
        d.fire_admin_unlock = true;
        d.suppress = true;
    }

    if user_mode {
        if blocked_key_matches(&rules.blocked_keys, vk) {
            d.suppress = true;
        }
        for combo in &rules.blocked_combinations {
            if combo.contains_key(vk) && held.len() == combo.len() && combo.satisfied_by(held) {
                d.suppress = true;
                break;
            }
        }
    }

    d
}

/// Single-key block check under the shared modifier equivalence: blocking
/// a generic modifier blocks both variants, and vice versa.
fn blocked_key_matches(blocked: &HashSet<Vk>, vk: Vk) -> bool {
    if blocked.contains(&vk) {
        return true;
    }
    match Modifier::from_vk(vk) {
        Some(m) => m.codes().iter().any(|c| blocked.contains(c)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(held: &mut HashSet<Vk>, vk: Vk) -> HashSet<Vk> {
        held.insert(vk);
        held.clone()
    }

    fn rules_with_hotkey(spec: &str) -> Rules {
        Rules {
            admin_hotkey: Some(KeySequence::parse(spec).expect("hotkey spec")),
            ..Rules::default()
        }
    }

    #[test]
    fn admin_unlock_fires_on_trigger_down() {
        // Scenario: LCtrl, LShift, LAlt held, then 'l' pressed.
        let rules = rules_with_hotkey("ctrl+shift+alt+l");
        let l = Vk::from_spec("l").unwrap();
        let mut held = HashSet::new();
        for vk in [Vk::LCONTROL, Vk::LSHIFT, Vk::LMENU] {
            let snap = press(&mut held, vk);
            let d = classify(&snap, vk, true, &rules, true);
            assert_eq!(d, Decision::default(), "modifier alone must not fire");
        }
        let snap = press(&mut held, l);
        let d = classify(&snap, l, true, &rules, true);
        assert!(d.fire_admin_unlock);
        assert!(d.suppress);
    }

    #[test]
    fn extra_held_key_defeats_unlock() {
        let rules = rules_with_hotkey("ctrl+shift+alt+l");
        let l = Vk::from_spec("l").unwrap();
        let x = Vk::from_spec("x").unwrap();
        let mut held = HashSet::new();
        for vk in [x, Vk::LCONTROL, Vk::LSHIFT, Vk::LMENU] {
            press(&mut held, vk);
        }
        let snap = press(&mut held, l);
        let d = classify(&snap, l, true, &rules, true);
        assert!(!d.fire_admin_unlock, "superset must never unlock");
    }

    #[test]
    fn unlock_requires_trigger_not_modifier() {
        // Pressing the last modifier while the trigger is somehow already
        // down must not fire: only the trigger's own down-event fires.
        let rules = rules_with_hotkey("ctrl+shift+alt+l");
        let l = Vk::from_spec("l").unwrap();
        let mut held = HashSet::new();
        for vk in [l, Vk::LCONTROL, Vk::LSHIFT] {
            press(&mut held, vk);
        }
        let snap = press(&mut held, Vk::LMENU);
        let d = classify(&snap, Vk::LMENU, true, &rules, true);
        assert!(!d.fire_admin_unlock);
    }

    #[test]
    fn admin_hotkey_active_in_admin_mode() {
        let rules = rules_with_hotkey("ctrl+shift+alt+l");
        let l = Vk::from_spec("l").unwrap();
        let held: HashSet<Vk> = [Vk::RCONTROL, Vk::RSHIFT, Vk::RMENU, l]
            .into_iter()
            .collect();
        // user_mode = false: blocking is inactive, the unlock path is not.
        let d = classify(&held, l, true, &rules, false);
        assert!(d.fire_admin_unlock);
    }

    #[test]
    fn blocked_single_key_only_in_user_mode() {
        let rules = Rules {
            blocked_keys: [Vk::F11].into_iter().collect(),
            ..Rules::default()
        };
        let held: HashSet<Vk> = [Vk::F11].into_iter().collect();
        let d = classify(&held, Vk::F11, true, &rules, true);
        assert!(d.suppress);
        assert!(!d.fire_admin_unlock);
        let d = classify(&held, Vk::F11, true, &rules, false);
        assert!(!d.suppress, "blocking is inactive in admin mode");
    }

    #[test]
    fn blocked_generic_modifier_suppresses_specific_variant() {
        let rules = Rules {
            blocked_keys: [Vk::LWIN].into_iter().collect(),
            ..Rules::default()
        };
        let held: HashSet<Vk> = [Vk::RWIN].into_iter().collect();
        assert!(classify(&held, Vk::RWIN, true, &rules, true).suppress);
    }

    #[test]
    fn blocked_combination_exact_size() {
        let rules = Rules {
            blocked_combinations: vec![KeySequence::parse("alt+tab").unwrap()],
            ..Rules::default()
        };
        let held: HashSet<Vk> = [Vk::LMENU, Vk::TAB].into_iter().collect();
        assert!(classify(&held, Vk::TAB, true, &rules, true).suppress);

        // A third held key makes it a different combination: not blocked.
        let held: HashSet<Vk> = [Vk::LMENU, Vk::LSHIFT, Vk::TAB].into_iter().collect();
        assert!(!classify(&held, Vk::TAB, true, &rules, true).suppress);
    }

    #[test]
    fn key_up_never_suppresses_or_fires() {
        let rules = Rules {
            admin_hotkey: Some(KeySequence::parse("ctrl+shift+alt+l").unwrap()),
            blocked_keys: [Vk::F11].into_iter().collect(),
            blocked_combinations: vec![KeySequence::parse("alt+tab").unwrap()],
        };
        let held = HashSet::new();
        assert_eq!(
            classify(&held, Vk::F11, false, &rules, true),
            Decision::default()
        );
    }

    #[test]
    fn unlock_and_block_may_both_apply() {
        // The trigger key itself is on the blocklist: suppression is
        // idempotent and the unlock still fires.
        let mut rules = rules_with_hotkey("ctrl+l");
        let l = Vk::from_spec("l").unwrap();
        rules.blocked_keys.insert(l);
        let held: HashSet<Vk> = [Vk::LCONTROL, l].into_iter().collect();
        let d = classify(&held, l, true, &rules, true);
        assert!(d.suppress);
        assert!(d.fire_admin_unlock);
    }
}
