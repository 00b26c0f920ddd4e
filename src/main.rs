//! portal: a tabbed temperature panel with cloud feed and on-device log.
//!
//! Run with:  `RUST_LOG=info portal [path/to/portal.toml]`
//!
//! The terminal is the screen, so log output goes to `portal.log` in the
//! config directory.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let log_dir = portal_config::config_dir();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating {}", log_dir.display()))?;
    let log_path = log_dir.join("portal.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    // Structured logging; RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    tracing::info!("portal v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(portal_config::default_path);
    let config = portal_config::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let panel = portal_terminal::TerminalPanel::open(&config)?;
    portal_app::run(config, &config_path, panel)?;

    tracing::info!("portal stopped");
    Ok(())
}
