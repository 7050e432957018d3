//! `tracing` setup shared by the CLI and embedders.
//!
//! Lines go to `~/.local/state/ims/ims.log`; callers fall back to stderr when
//! that file can't be opened. `RUST_LOG` overrides [`DEFAULT_FILTER`].

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,ims=debug,ims_core=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log file location under the XDG state dir.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ims")?;
    Ok(xdg_dirs.get_state_home().join("ims.log"))
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))
}

/// Install the global subscriber writing to [`log_path`].
pub fn init_logging() -> Result<()> {
    let path = log_path()?;
    init_logging_at(&path)?;
    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}

/// Install the global subscriber writing to `path` (appending).
pub fn init_logging_at(path: &Path) -> Result<()> {
    let file = open_log(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging already initialized: {e}"))
}

/// Stderr-only subscriber. Does nothing if one is already installed.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
