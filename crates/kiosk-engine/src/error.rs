use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the kiosk engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Errors originating from the keyboard-hook layer.
    #[error("Hook manager error: {0}")]
    Hotkey(#[from] win_hotkey::Error),

    /// Errors originating from window operations.
    #[error("Window operation error: {0}")]
    WinOps(#[from] win_winops::Error),

    /// The UI event channel has been closed by the receiver.
    #[error("UI channel closed")]
    ChannelClosed,
}
