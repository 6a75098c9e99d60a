//! Logging setup
//!
//! The TUI owns stdout, so interactive sessions log to a file through a
//! non-blocking writer. `--list` runs log to stderr instead.

use crate::config::Config;
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn env_filter(default_level: &str) -> EnvFilter {
    // Fallback to the configured level if RUST_LOG is not set or invalid
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Keep the returned guard alive until exit
/// so buffered lines get flushed.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>> {
    if config.list_only {
        let _ = tracing_subscriber::registry()
            .with(env_filter(&config.log_level))
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init();
        return Ok(None);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("failed to open log file {}", config.log_file.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let _ = tracing_subscriber::registry()
        .with(env_filter(&config.log_level))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init();

    Ok(Some(guard))
}
