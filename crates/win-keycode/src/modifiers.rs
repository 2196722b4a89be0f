//! Modifier families and the generic/left/right equivalence table.

use std::collections::HashSet;

use crate::Vk;

/// The four modifier families on Windows keyboards.
///
/// Each family covers a generic virtual-key code plus the left/right
/// variants the low-level hook actually delivers; the Win family has no
/// generic code, only `lwin`/`rwin`. The hotkey matcher and the blocked-
/// combination matcher both resolve equivalence through this table so the
/// two paths cannot drift apart.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Modifier {
    Control,
    Shift,
    Alt,
    Win,
}

impl Modifier {
    /// All virtual-key codes that count as this modifier.
    pub fn codes(self) -> &'static [Vk] {
        match self {
            Self::Control => &[Vk::CONTROL, Vk::LCONTROL, Vk::RCONTROL],
            Self::Shift => &[Vk::SHIFT, Vk::LSHIFT, Vk::RSHIFT],
            Self::Alt => &[Vk::MENU, Vk::LMENU, Vk::RMENU],
            Self::Win => &[Vk::LWIN, Vk::RWIN],
        }
    }

    /// Classify a virtual-key code into its modifier family, if any.
    pub fn from_vk(vk: Vk) -> Option<Self> {
        [Self::Control, Self::Shift, Self::Alt, Self::Win]
            .into_iter()
            .find(|m| m.codes().contains(&vk))
    }

    /// True if any variant of this family is present in `held`.
    pub fn is_held(self, held: &HashSet<Vk>) -> bool {
        self.codes().iter().any(|vk| held.contains(vk))
    }
}

/// The shared satisfaction predicate used by every matching path.
///
/// A modifier component is satisfied by any of its generic/left/right
/// variants being held; a non-modifier component only by exact presence.
pub fn key_satisfied(component: Vk, held: &HashSet<Vk>) -> bool {
    match Modifier::from_vk(component) {
        Some(m) => m.is_held(held),
        None => held.contains(&component),
    }
}
