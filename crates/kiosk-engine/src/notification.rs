//! Facts the engine reports to the presentation layer.
//!
//! The UI owns all visual feedback; this core only emits events. Sends
//! are non-blocking and a closed channel degrades to an error the caller
//! may ignore during teardown.

use tokio::sync::mpsc::UnboundedSender;
use tracing::info;
use win_winops::{DetectionHints, ScoredWindow, WindowId};

use crate::{Error, Result};

/// Event-style notifications consumed by the UI collaborator.
#[derive(Debug, Clone)]
pub enum Notice {
    /// The admin-unlock combination was completed.
    AdminUnlockRequested,
    /// A monitored application's main window was found and activated.
    AppActivated {
        /// Whitelist path that identifies the application.
        path: String,
    },
    /// A monitoring session gave up without activating a window.
    AppActivationFailed {
        /// Whitelist path that identifies the application.
        path: String,
        /// Human-readable reason, suitable for display.
        reason: String,
    },
    /// A detection pass finished; carries everything the manual
    /// disambiguation UI needs.
    DetectionCompleted {
        /// Every window considered, scored or marked disqualified.
        windows: Vec<ScoredWindow>,
        /// Best automatic guess, when one qualified.
        best: Option<WindowId>,
        /// Hints derived from the best guess, ready to store per app.
        hints: Option<DetectionHints>,
        /// True when an automatic winner was found.
        success: bool,
        /// Failure text when `success` is false.
        error: Option<String>,
    },
}

/// Sends engine notices to the UI layer.
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: UnboundedSender<Notice>,
}

impl NotificationDispatcher {
    /// Create a new dispatcher from a UI notice channel.
    pub fn new(tx: UnboundedSender<Notice>) -> Self {
        Self { tx }
    }

    /// Send a notice. Logged at info level for traceability.
    pub fn send(&self, notice: Notice) -> Result<()> {
        info!(kind = notice_kind(&notice), "notice");
        self.tx.send(notice).map_err(|_| Error::ChannelClosed)
    }

    /// Convenience: admin unlock was requested.
    pub fn send_admin_unlock(&self) -> Result<()> {
        self.send(Notice::AdminUnlockRequested)
    }

    /// Convenience: application activated.
    pub fn send_activated(&self, path: &str) -> Result<()> {
        self.send(Notice::AppActivated { path: path.into() })
    }

    /// Convenience: activation failed.
    pub fn send_activation_failed(&self, path: &str, reason: String) -> Result<()> {
        self.send(Notice::AppActivationFailed {
            path: path.into(),
            reason,
        })
    }
}

/// Compact label for log lines; payloads stay out of the log.
fn notice_kind(n: &Notice) -> &'static str {
    match n {
        Notice::AdminUnlockRequested => "admin_unlock_requested",
        Notice::AppActivated { .. } => "app_activated",
        Notice::AppActivationFailed { .. } => "app_activation_failed",
        Notice::DetectionCompleted { .. } => "detection_completed",
    }
}
