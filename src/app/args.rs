use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "device-console")]
#[command(about = "Tails a device log file and shows it as a color-coded console")]
pub struct AppArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(
        long,
        global = true,
        help = "Log file to tail (defaults to <data-dir>/idevice_log.txt)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, default_value = ".", help = "Data directory")]
    pub data_dir: PathBuf,

    #[arg(long, global = true, help = "Seconds between polls of the log file")]
    pub interval: Option<u64>,

    #[arg(long, global = true, help = "Maximum number of entries kept in memory")]
    pub max_entries: Option<usize>,

    #[arg(long, global = true, help = "Start with auto scroll disabled")]
    pub no_auto_scroll: bool,

    #[arg(long, global = true, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output in follow mode")]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Interactive full-screen console (default)
    #[default]
    Tui,
    /// Load the log once and print the copy-all text
    Dump,
    /// Print entries as they arrive until interrupted
    Follow,
}

impl AppArgs {
    pub fn from_cli() -> Self {
        <Self as Parser>::parse()
    }

    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_interactive_console() {
        let args = AppArgs::try_parse_from(["device-console"]).unwrap();
        assert_eq!(args.command(), Command::Tui);
        assert_eq!(args.data_dir, PathBuf::from("."));
        assert!(args.interval.is_none());
        assert!(!args.no_auto_scroll);
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let args = AppArgs::try_parse_from([
            "device-console",
            "follow",
            "--interval",
            "5",
            "--log-file",
            "/tmp/device.log",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(args.command(), Command::Follow);
        assert_eq!(args.interval, Some(5));
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/device.log")));
        assert!(args.no_color);
    }
}
