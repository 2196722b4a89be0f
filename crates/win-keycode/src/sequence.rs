//! Key sequences: the unit of hotkey and block-list configuration.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{Modifier, Vk, key_satisfied};

/// Maximum number of keys in a sequence.
pub const MAX_KEYS: usize = 4;

/// An ordered, duplicate-free set of keys, matched order-insensitively.
///
/// Used both for the admin hotkey and for blocked combinations. Two codes
/// from the same modifier family count as duplicates, since they are
/// interchangeable when matching.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KeySequence {
    keys: Vec<Vk>,
}

impl KeySequence {
    /// Build a sequence from resolved codes.
    ///
    /// Returns `None` when empty, longer than [`MAX_KEYS`], or containing
    /// duplicates (modifier families collapse before the duplicate check).
    pub fn from_keys(keys: Vec<Vk>) -> Option<Self> {
        if keys.is_empty() || keys.len() > MAX_KEYS {
            return None;
        }
        let mut seen: HashSet<u32> = HashSet::new();
        for &vk in &keys {
            // Collapse each family to one slot; raw value otherwise.
            let slot = match Modifier::from_vk(vk) {
                Some(m) => 0x1_0000 + m.codes()[0].0 as u32,
                None => vk.0 as u32,
            };
            if !seen.insert(slot) {
                return None;
            }
        }
        Some(Self { keys })
    }

    /// Parse a `"ctrl+shift+l"`-style spec, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        let keys = s
            .split('+')
            .map(Vk::from_spec)
            .collect::<Option<Vec<_>>>()?;
        Self::from_keys(keys)
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if the sequence holds no keys. Construction forbids this, so
    /// only a default-deserialized value can observe it.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The component keys in configuration order.
    pub fn keys(&self) -> &[Vk] {
        &self.keys
    }

    /// True if `vk` matches one of the components, modifier families
    /// being interchangeable.
    pub fn contains_key(&self, vk: Vk) -> bool {
        self.keys.iter().any(|&c| match Modifier::from_vk(c) {
            Some(m) => m.codes().contains(&vk),
            None => c == vk,
        })
    }

    /// The single non-modifier component, when exactly one exists.
    ///
    /// An admin hotkey is required to have such a trigger; sequences with
    /// zero or several non-modifiers return `None`.
    pub fn trigger(&self) -> Option<Vk> {
        let mut non_mods = self
            .keys
            .iter()
            .copied()
            .filter(|&vk| Modifier::from_vk(vk).is_none());
        match (non_mods.next(), non_mods.next()) {
            (Some(vk), None) => Some(vk),
            _ => None,
        }
    }

    /// True when every component is satisfied by `held` under the shared
    /// modifier-equivalence predicate.
    pub fn satisfied_by(&self, held: &HashSet<Vk>) -> bool {
        self.keys.iter().all(|&c| key_satisfied(c, held))
    }

    /// Canonical string form: modifiers in Ctrl/Shift/Alt/Win order, then
    /// the remaining keys in configuration order.
    pub fn to_string_canonical(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.keys.len());
        let mut mods: Vec<(usize, Vk)> = Vec::new();
        for &vk in &self.keys {
            if let Some(m) = Modifier::from_vk(vk) {
                mods.push((modifier_order(m), vk));
            }
        }
        mods.sort_by_key(|&(ord, _)| ord);
        for (_, vk) in mods {
            parts.push(vk.to_spec());
        }
        for &vk in &self.keys {
            if Modifier::from_vk(vk).is_none() {
                parts.push(vk.to_spec());
            }
        }
        parts.join("+")
    }
}

fn modifier_order(m: Modifier) -> usize {
    match m {
        Modifier::Control => 0,
        Modifier::Shift => 1,
        Modifier::Alt => 2,
        Modifier::Win => 3,
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic() {
        let s = KeySequence::parse("ctrl+shift+alt+l").expect("parse");
        assert_eq!(s.len(), 4);
        assert_eq!(s.trigger(), Vk::from_spec("l"));
        assert_eq!(s.to_string(), "ctrl+shift+alt+l");
    }

    #[test]
    fn parse_is_case_insensitive_and_canonicalizes() {
        let s = KeySequence::parse("ALT+Ctrl+L").expect("parse");
        assert_eq!(s.to_string(), "ctrl+alt+l");
        let reparsed = KeySequence::parse(&s.to_string()).expect("reparse");
        assert_eq!(s, reparsed);
    }

    #[test]
    fn rejects_empty_oversize_and_duplicates() {
        assert!(KeySequence::parse("").is_none());
        assert!(KeySequence::parse("ctrl+shift+alt+win+l").is_none());
        assert!(KeySequence::parse("ctrl+ctrl+l").is_none());
        // lctrl and ctrl are the same family, so also duplicates.
        assert!(KeySequence::parse("ctrl+lctrl+l").is_none());
    }

    #[test]
    fn trigger_requires_exactly_one_non_modifier() {
        assert!(KeySequence::parse("ctrl+shift").unwrap().trigger().is_none());
        assert!(KeySequence::parse("ctrl+a+b").unwrap().trigger().is_none());
        assert_eq!(
            KeySequence::parse("ctrl+f11").unwrap().trigger(),
            Some(Vk::F11)
        );
    }

    #[test]
    fn satisfied_by_specific_variants() {
        let s = KeySequence::parse("ctrl+shift+alt+l").unwrap();
        let held: HashSet<Vk> = [
            Vk::LCONTROL,
            Vk::LSHIFT,
            Vk::LMENU,
            Vk::from_spec("l").unwrap(),
        ]
        .into_iter()
        .collect();
        assert!(s.satisfied_by(&held));

        let partial: HashSet<Vk> = [Vk::LCONTROL, Vk::LSHIFT].into_iter().collect();
        assert!(!s.satisfied_by(&partial));
    }

    #[test]
    fn contains_key_spans_modifier_family() {
        let s = KeySequence::parse("alt+tab").unwrap();
        assert!(s.contains_key(Vk::LMENU));
        assert!(s.contains_key(Vk::RMENU));
        assert!(s.contains_key(Vk::TAB));
        assert!(!s.contains_key(Vk::LCONTROL));
    }
}
