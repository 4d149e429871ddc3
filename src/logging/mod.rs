//! Installs the `tracing` subscriber.
//!
//! The interactive console owns the alternate screen, so its diagnostics go
//! to a file in the data directory. The headless modes log to stderr and
//! keep stdout for log output.
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "device-console.log";

const FILE_FILTER: &str = "info,device_console=debug";
const STDERR_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// default filter. A subscriber that is already installed is left alone.
pub fn init(target: LogTarget) -> Result<()> {
    match target {
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("could not create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("could not open log file {}", path.display()))?;

            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter(FILE_FILTER))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter(STDERR_FILTER))
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
    Ok(())
}

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
