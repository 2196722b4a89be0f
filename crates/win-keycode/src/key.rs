//! The `Vk` virtual-key newtype and the fixed symbolic name table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A Windows virtual-key code.
///
/// Equality is by raw value. Modifier keys exist both as a generic code
/// (e.g. [`Vk::CONTROL`]) and as left/right-specific codes; the equivalence
/// between them lives in [`crate::Modifier`], not here.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Vk(pub u16);

#[allow(missing_docs)]
impl Vk {
    pub const BACK: Self = Self(0x08);
    pub const TAB: Self = Self(0x09);
    pub const RETURN: Self = Self(0x0D);
    pub const SHIFT: Self = Self(0x10);
    pub const CONTROL: Self = Self(0x11);
    pub const MENU: Self = Self(0x12);
    pub const PAUSE: Self = Self(0x13);
    pub const CAPITAL: Self = Self(0x14);
    pub const ESCAPE: Self = Self(0x1B);
    pub const SPACE: Self = Self(0x20);
    pub const PRIOR: Self = Self(0x21);
    pub const NEXT: Self = Self(0x22);
    pub const END: Self = Self(0x23);
    pub const HOME: Self = Self(0x24);
    pub const LEFT: Self = Self(0x25);
    pub const UP: Self = Self(0x26);
    pub const RIGHT: Self = Self(0x27);
    pub const DOWN: Self = Self(0x28);
    pub const SNAPSHOT: Self = Self(0x2C);
    pub const INSERT: Self = Self(0x2D);
    pub const DELETE: Self = Self(0x2E);
    pub const LWIN: Self = Self(0x5B);
    pub const RWIN: Self = Self(0x5C);
    pub const APPS: Self = Self(0x5D);
    pub const F1: Self = Self(0x70);
    pub const F2: Self = Self(0x71);
    pub const F3: Self = Self(0x72);
    pub const F4: Self = Self(0x73);
    pub const F5: Self = Self(0x74);
    pub const F6: Self = Self(0x75);
    pub const F7: Self = Self(0x76);
    pub const F8: Self = Self(0x77);
    pub const F9: Self = Self(0x78);
    pub const F10: Self = Self(0x79);
    pub const F11: Self = Self(0x7A);
    pub const F12: Self = Self(0x7B);
    pub const LSHIFT: Self = Self(0xA0);
    pub const RSHIFT: Self = Self(0xA1);
    pub const LCONTROL: Self = Self(0xA2);
    pub const RCONTROL: Self = Self(0xA3);
    pub const LMENU: Self = Self(0xA4);
    pub const RMENU: Self = Self(0xA5);
}

/// Canonical name table: the first entry for a code is its canonical spec
/// name; later entries are accepted aliases.
const NAMES: &[(&str, Vk)] = &[
    ("ctrl", Vk::CONTROL),
    ("control", Vk::CONTROL),
    ("lctrl", Vk::LCONTROL),
    ("rctrl", Vk::RCONTROL),
    ("shift", Vk::SHIFT),
    ("lshift", Vk::LSHIFT),
    ("rshift", Vk::RSHIFT),
    ("alt", Vk::MENU),
    ("menu", Vk::MENU),
    ("lalt", Vk::LMENU),
    ("ralt", Vk::RMENU),
    ("lwin", Vk::LWIN),
    ("win", Vk::LWIN),
    ("rwin", Vk::RWIN),
    ("esc", Vk::ESCAPE),
    ("escape", Vk::ESCAPE),
    ("tab", Vk::TAB),
    ("enter", Vk::RETURN),
    ("return", Vk::RETURN),
    ("space", Vk::SPACE),
    ("backspace", Vk::BACK),
    ("delete", Vk::DELETE),
    ("del", Vk::DELETE),
    ("insert", Vk::INSERT),
    ("home", Vk::HOME),
    ("end", Vk::END),
    ("pgup", Vk::PRIOR),
    ("pgdn", Vk::NEXT),
    ("left", Vk::LEFT),
    ("up", Vk::UP),
    ("right", Vk::RIGHT),
    ("down", Vk::DOWN),
    ("capslock", Vk::CAPITAL),
    ("pause", Vk::PAUSE),
    ("printscreen", Vk::SNAPSHOT),
    ("apps", Vk::APPS),
    ("f1", Vk::F1),
    ("f2", Vk::F2),
    ("f3", Vk::F3),
    ("f4", Vk::F4),
    ("f5", Vk::F5),
    ("f6", Vk::F6),
    ("f7", Vk::F7),
    ("f8", Vk::F8),
    ("f9", Vk::F9),
    ("f10", Vk::F10),
    ("f11", Vk::F11),
    ("f12", Vk::F12),
];

impl Vk {
    /// Parse a symbolic key name.
    ///
    /// Accepts the fixed name table (case-insensitive, including aliases
    /// like `esc`/`escape` and `ctrl`/`control`) plus single letters and
    /// digits, which map onto their ASCII virtual-key codes.
    pub fn from_spec(s: &str) -> Option<Self> {
        let spec = s.trim().to_ascii_lowercase();
        if let Some(&(_, vk)) = NAMES.iter().find(|(n, _)| *n == spec) {
            return Some(vk);
        }
        let mut chars = spec.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => {
                Some(Self(c.to_ascii_uppercase() as u16))
            }
            _ => None,
        }
    }

    /// The canonical spec name for this code, always lowercased.
    ///
    /// Letters and digits render as themselves; codes outside the name
    /// table render as `vk(0xNN)` so diagnostics never lose information.
    pub fn to_spec(self) -> String {
        if let Some(&(name, _)) = NAMES.iter().find(|(_, vk)| *vk == self) {
            return name.to_string();
        }
        match self.0 {
            0x30..=0x39 | 0x41..=0x5A => char::from(self.0 as u8)
                .to_ascii_lowercase()
                .to_string(),
            raw => format!("vk(0x{raw:02X})"),
        }
    }
}

impl fmt::Debug for Vk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vk({})", self.to_spec())
    }
}

impl fmt::Display for Vk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_spec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_roundtrip() {
        for &(name, vk) in NAMES {
            let parsed = Vk::from_spec(name).expect("name table entry parses");
            assert_eq!(parsed, vk, "{}", name);
        }
        // Canonical form reparses to the same code.
        for vk in [Vk::CONTROL, Vk::LWIN, Vk::F11, Vk::ESCAPE, Vk::RMENU] {
            assert_eq!(Vk::from_spec(&vk.to_spec()), Some(vk));
        }
    }

    #[test]
    fn letters_and_digits() {
        assert_eq!(Vk::from_spec("l"), Some(Vk(0x4C)));
        assert_eq!(Vk::from_spec("L"), Some(Vk(0x4C)));
        assert_eq!(Vk::from_spec("7"), Some(Vk(0x37)));
        assert_eq!(Vk(0x4C).to_spec(), "l");
        assert_eq!(Vk(0x37).to_spec(), "7");
    }

    #[test]
    fn aliases() {
        assert_eq!(Vk::from_spec("control"), Some(Vk::CONTROL));
        assert_eq!(Vk::from_spec("ESC"), Some(Vk::ESCAPE));
        assert_eq!(Vk::from_spec("win"), Some(Vk::LWIN));
        // Canonical name is the first table entry, not the alias.
        assert_eq!(Vk::CONTROL.to_spec(), "ctrl");
        assert_eq!(Vk::ESCAPE.to_spec(), "esc");
    }

    #[test]
    fn unknown_specs_fail() {
        assert_eq!(Vk::from_spec(""), None);
        assert_eq!(Vk::from_spec("hyperkey"), None);
        assert_eq!(Vk::from_spec("f13"), None);
    }

    #[test]
    fn unnamed_code_renders_raw() {
        assert_eq!(Vk(0xE7).to_spec(), "vk(0xE7)");
    }
}
