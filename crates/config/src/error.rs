//! Error types for configuration loading.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced while reading or parsing a configuration file.
///
/// Key-level defects never surface here: invalid entries are skipped with
/// a warning during resolution.
#[derive(Debug, Error, Clone)]
pub enum Error {
    #[error("{message}")]
    /// I/O or filesystem read error.
    Read {
        /// Path associated with the read error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// JSON parse error with a concrete line/column location.
    Parse {
        /// Path associated with the parse error.
        path: Option<PathBuf>,
        /// 1-based line number.
        line: usize,
        /// 1-based column number.
        col: usize,
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// Render a human-friendly message including location when available.
    pub fn pretty(&self) -> String {
        match self {
            Self::Read { path, message } => match path {
                Some(p) => format!("Read error at {}: {}", p.display(), message),
                None => format!("Read error: {}", message),
            },
            Self::Parse {
                path,
                line,
                col,
                message,
            } => match path {
                Some(p) => format!(
                    "Config parse error at {}:{}:{}\n{}",
                    p.display(),
                    line,
                    col,
                    message
                ),
                None => format!(
                    "Config parse error at line {}, column {}\n{}",
                    line, col, message
                ),
            },
        }
    }

    /// Attach a file path to an error produced without one.
    pub(crate) fn with_path(self, p: &Path) -> Self {
        match self {
            Self::Read { message, .. } => Self::Read {
                path: Some(p.to_path_buf()),
                message,
            },
            Self::Parse {
                line,
                col,
                message,
                ..
            } => Self::Parse {
                path: Some(p.to_path_buf()),
                line,
                col,
                message,
            },
        }
    }
}
