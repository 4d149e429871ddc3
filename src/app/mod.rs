pub mod args;
mod config;
mod headless;
mod setup;

pub use args::{AppArgs, Command};
pub use config::Settings;

use anyhow::Result;

pub async fn launch() -> Result<()> {
    launch_with_args(AppArgs::from_cli()).await
}

pub async fn launch_with_args(args: AppArgs) -> Result<()> {
    let setup::PreparedApp { command, settings } = setup::prepare(args)?;

    match command {
        Command::Tui => crate::ui::run_console(settings).await,
        Command::Dump => headless::dump(&settings).await,
        Command::Follow => headless::follow(&settings).await,
    }
}
