//! win-winops: window discovery, scoring, and activation for the kiosk
//! engine.
//!
//! Provides a single enumeration pass over every window in the process
//! space ([`WindowSnapshot`]), the additive main-window scoring heuristic
//! ([`score`]), and a best-effort activation primitive that tolerates the
//! OS's foreground-focus-stealing restrictions.
//!
//! The native surface is Windows-only and reached through the
//! [`ops::WinOps`] trait; everything above that boundary (scoring, the
//! survey read path, process-tree walking) is portable and tested against
//! [`ops::MockWinOps`].

#[cfg(windows)]
mod activate;
mod error;
pub mod ops;
#[cfg(windows)]
mod process;
pub mod score;
#[cfg(windows)]
mod sys;
mod window;

pub use error::{Error, Result};
pub use score::{DEFAULT_MIN_SCORE, ScoredWindow, find_best_window, score_window, survey};
pub use window::{DetectionHints, WS_EX_APPWINDOW, WindowId, WindowSnapshot};
