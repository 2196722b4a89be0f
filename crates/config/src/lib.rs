//! Kiosk configuration store.
//!
//! Reads the JSON configuration consumed at startup and on demand,
//! resolves symbolic key names through the fixed name table, and applies
//! the documented defaults. Invalid entries are skipped with a warning,
//! never fatal: an unparseable hotkey leaves the built-in default in
//! place so a locked session always has an unlock path.

mod error;
mod loader;
mod types;

pub use error::Error;
pub use loader::{load_from_path, load_from_str};
pub use types::{
    Config, DEFAULT_ADMIN_HOTKEY, DEFAULT_DETECTION_POLL_MS, DEFAULT_DETECTION_WAIT_MS, RawConfig,
};
