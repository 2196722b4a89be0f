//! Error types and result alias for the win-hotkey crate.
use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type used throughout this crate.
pub type Result<T> = StdResult<T, Error>;

/// Error variants produced by this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying OS provided an error.
    #[error("OS error: {0}")]
    OsError(String),
    /// The low-level keyboard hook could not be installed.
    #[error("Keyboard hook failed to install: {0}")]
    HookInstall(String),
    /// The hook thread is already running.
    #[error("Hook already running")]
    AlreadyRunning,
    /// The platform does not provide a global keyboard hook.
    #[error("Global keyboard hook unsupported on this platform")]
    Unsupported,
}
