//! Logging init: append to a file under the XDG state dir, or fall back to a
//! quiet stderr subscriber.
//!
//! Stdout carries the user-facing report and stderr the single error line, so
//! the stderr fallback only lets warnings through unless `RUST_LOG` says otherwise.

use anyhow::Result;
use std::fs;
use std::io;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const FILE_FILTER: &str = "info,flakebump_core=debug";
const STDERR_FILTER: &str = "warn";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to `~/.local/state/flakebump/flakebump.log`.
///
/// Returns Err when the state dir or log file is unusable (e.g. `HOME` points
/// at a read-only location inside a Nix build); call [`init_logging_stderr`] then.
pub fn init_logging() -> Result<()> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("flakebump")?;
    let log_file_path = xdg_dirs.place_state_file("flakebump.log")?;

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(FILE_FILTER))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!("flakebump logging initialized at {}", log_file_path.display());

    Ok(())
}

/// Log warnings and errors to stderr only.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(STDERR_FILTER))
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
