//! Headless driver for the kiosk OS-interaction engine.
//!
//! Loads configuration, installs the keyboard hook, and logs every notice
//! the engine emits. Stands in for the presentation layer during bring-up
//! and smoke testing; on an admin unlock it simply drops to admin mode.

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use kiosk_engine::{Engine, Notice};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*};
use win_winops::ops::WinOps;

#[derive(Parser, Debug)]
#[command(name = "kioskd", about = "Kiosk OS-interaction engine driver", version)]
/// Command-line interface for the `kioskd` binary.
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start in admin mode (key blocking inactive).
    #[arg(long)]
    admin: bool,

    /// Logging controls.
    #[command(flatten)]
    logs: logging::LogArgs,
}

/// The OS surface: real on Windows, mock elsewhere so the engine can be
/// smoke-driven on any host.
fn ops() -> Arc<dyn WinOps> {
    #[cfg(windows)]
    {
        Arc::new(win_winops::ops::RealWinOps)
    }
    #[cfg(not(windows))]
    {
        Arc::new(win_winops::ops::MockWinOps::new())
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let spec = logging::compute_spec(
        cli.logs.trace,
        cli.logs.debug,
        cli.logs.log_level.as_deref(),
        cli.logs.log_filter.as_deref(),
    );
    tracing_subscriber::registry()
        .with(logging::env_filter_from_spec(&spec))
        .with(fmt::layer())
        .init();

    let cfg = match &cli.config {
        Some(path) => match config::load_from_path(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("{}; using defaults", e.pretty());
                config::Config::default()
            }
        },
        None => config::Config::default(),
    };
    info!(hotkey = %cfg.admin_hotkey, "configuration loaded");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut engine = Engine::new(ops(), &cfg, tx);
    engine.set_user_mode(!cli.admin);
    if let Err(e) = engine.start() {
        warn!(err = %e, "running without keyboard capture");
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
            notice = rx.recv() => match notice {
                Some(Notice::AdminUnlockRequested) => {
                    info!("admin unlock requested; leaving user mode");
                    engine.set_user_mode(false);
                }
                Some(n) => info!(notice = ?n, "notice"),
                None => break,
            }
        }
    }
    engine.shutdown();
}
