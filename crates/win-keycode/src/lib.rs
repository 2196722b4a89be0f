//! win-keycode: Virtual-key codes and key sequences for Windows.
//!
//! - [`Vk`]: Newtype over the Win32 virtual-key code space, with associated
//!   constants for the keys the engine names and a fixed symbolic name table
//!   (`Vk::from_spec`, `Vk::to_spec`).
//! - [`Modifier`]: The four modifier families (Ctrl/Shift/Alt/Win), each
//!   covering its generic and left/right-specific codes. All matching paths
//!   share this single equivalence table.
//! - [`KeySequence`]: An ordered, duplicate-free set of up to four keys,
//!   parsed from `"ctrl+shift+l"`-style specs, matched order-insensitively.

mod key;
pub use key::Vk;

mod modifiers;
pub use modifiers::{Modifier, key_satisfied};

mod sequence;
pub use sequence::{KeySequence, MAX_KEYS};
