//! Dual-destination logging bootstrap using `tracing`: everything at INFO and
//! above goes to the console and to an append-only log file under the
//! per-user data directory.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE_NAME: &str = "log.txt";

/// Per-user directory holding the log file.
pub fn default_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".javcli")
}

/// Install the global subscriber. Creates `dir` if absent and is safe to call
/// more than once; later calls are no-ops.
pub fn init(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let log_path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_filter(env_filter);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Arc::new(file))
        .with_filter(LevelFilter::INFO);

    // try_init covers the window between has_been_set and registration when
    // another subscriber won the race (e.g. repeated init in tests).
    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .ok();

    Ok(())
}
