// Tracing setup
//
// The TUI owns the terminal, so interactive sessions log to a file. CLI
// subcommands log to stderr. RUST_LOG overrides the default filter.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "expense-tracker.log";

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("expense_tracker=debug,info")
        } else {
            EnvFilter::new("expense_tracker=info,warn")
        }
    })
}

/// Append logs to `<dir>/expense-tracker.log`; returns the file path
pub fn init_file_logging(dir: &Path, verbose: bool) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(path = %path.display(), "file logging initialized");
    Ok(path)
}

pub fn init_stderr_logging(verbose: bool) {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // Ignore a second install (tests, repeated calls)
    let _ = tracing_subscriber::registry()
        .with(filter(verbose))
        .with(stderr_layer)
        .try_init();
}
