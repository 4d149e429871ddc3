use anyhow::{Context, Result};
use crossterm::{cursor, execute, terminal};
use std::io::stdout;
use tracing::warn;

use super::TerminalUI;

impl TerminalUI {
    /// Switches to raw mode on the alternate screen.
    pub(super) fn initialize_terminal(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        self.terminal_active = true;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)
            .context("entering the alternate screen")?;

        self.state.terminal_size = terminal::size()?;
        Ok(())
    }

    /// Restores the terminal. Safe to call more than once.
    pub fn cleanup(&mut self) -> Result<()> {
        if !self.terminal_active {
            return Ok(());
        }
        self.terminal_active = false;

        terminal::disable_raw_mode()?;
        execute!(stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
        Ok(())
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}
