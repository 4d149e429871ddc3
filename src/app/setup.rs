//! This module handles the initial setup of the application.
use super::args::{AppArgs, Command};
use super::config::{ConsoleConfig, Settings};
use crate::logging::{self, LogTarget};
use anyhow::{Context, Result};
use tracing::info;

/// Everything a mode needs to run.
pub struct PreparedApp {
    /// The mode selected on the command line.
    pub command: Command,
    /// Defaults, config file and flags merged together.
    pub settings: Settings,
}

/// Prepares the application for running.
///
/// This function performs the following steps:
/// 1. Loads the config file, if any, and merges it with the flags.
/// 2. Creates the data directory.
/// 3. Configures logging for the selected mode.
///
/// # Errors
///
/// This function will return an error if the config is invalid or the data
/// directory or log file cannot be created.
pub fn prepare(args: AppArgs) -> Result<PreparedApp> {
    let command = args.command();
    let config = ConsoleConfig::discover(&args)?;
    let settings = Settings::resolve(&args, config)?;

    std::fs::create_dir_all(&settings.data_dir).with_context(|| {
        format!(
            "could not create data directory {}",
            settings.data_dir.display()
        )
    })?;

    configure_logging(command, &settings)?;
    info!(
        ?command,
        log_file = %settings.log_file.display(),
        interval_secs = settings.poll_interval.as_secs(),
        max_entries = settings.max_entries,
        "Settings resolved"
    );

    Ok(PreparedApp { command, settings })
}

/// Configures logging for the application.
///
/// The interactive console logs to a file next to its data; the headless
/// modes log to stderr.
fn configure_logging(command: Command, settings: &Settings) -> Result<()> {
    let target = match command {
        Command::Tui => LogTarget::File(settings.data_dir.join(logging::LOG_FILE_NAME)),
        Command::Dump | Command::Follow => LogTarget::Stderr,
    };
    logging::init(target)
}

/// Prints a banner with startup information.
pub(super) fn print_start_banner(settings: &Settings) {
    println!("📜 Following {}", settings.log_file.display());
    println!(
        "Polling every {}s, keeping the last {} entries",
        settings.poll_interval.as_secs(),
        settings.max_entries
    );
    println!("Press Ctrl+C to stop");
    println!();
}
