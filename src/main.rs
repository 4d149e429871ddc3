//! The main entry point for the device-console application.
mod app;
mod console;
mod logging;
mod tail;
mod ui;

use anyhow::Result;

/// The main function of the application.
///
/// Parses the command line and runs the selected mode: the interactive
/// console, a one-shot dump or a streaming follow.
///
/// # Errors
///
/// Returns an error if setup fails or the selected mode hits a fatal
/// terminal or I/O error.
#[tokio::main]
async fn main() -> Result<()> {
    app::launch().await
}
