//! Error types for window operations.

use std::result::Result as StdResult;

use thiserror::Error;

/// Errors that can occur during window operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The window handle no longer refers to a live window.
    #[error("Window gone")]
    WindowGone,

    /// Activation could not bring the window to the foreground.
    #[error("Activation failed: {0}")]
    ActivationFailed(String),

    /// Underlying OS call failed.
    #[error("OS error: {0}")]
    Os(String),

    /// The operation has no implementation on this platform.
    #[error("Unsupported on this platform")]
    Unsupported,
}

/// Convenient result type used throughout this crate.
pub type Result<T> = StdResult<T, Error>;
