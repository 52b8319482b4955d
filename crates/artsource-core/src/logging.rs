//! Tracing setup. Logs go to a file under the XDG state dir; the CLI falls
//! back to stderr when that file cannot be opened.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const APP: &str = "artsource";

/// Used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info,artsource=debug,artsource_core=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/artsource/artsource.log`
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP)?;
    Ok(xdg_dirs.get_state_home().join(format!("{APP}.log")))
}

/// Installs the global subscriber writing to [`log_file_path`].
///
/// Errors (unwritable state dir, subscriber already set) are returned so the
/// caller can fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))?;

    tracing::info!("artsource logging initialized at {}", path.display());
    Ok(())
}

/// Logs to stderr only. A subscriber that is already installed is kept.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
