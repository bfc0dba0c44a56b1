//! File logging setup.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber, writing to `log_file` so output does not
/// interfere with the TUI. Filtering follows `RUST_LOG`, default `info`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or a global subscriber is
/// already installed.
pub fn init_logging(log_file: &Path) -> Result<()> {
    let file = std::fs::File::create(log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}
