use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::console::{DeviceInfo, LogStore};
use crate::ui::clipboard::ClipboardSink;
use crate::ui::{ConsoleState, UIAction, UIEvent};

/// Owns the terminal while the console is active.
pub struct TerminalUI {
    pub(super) state: ConsoleState,
    pub(super) store: Arc<LogStore>,
    pub(super) device: DeviceInfo,
    pub(super) source_name: String,
    pub(super) event_rx: mpsc::UnboundedReceiver<UIEvent>,
    pub(super) action_tx: mpsc::UnboundedSender<UIAction>,
    pub(super) clipboard: Box<dyn ClipboardSink>,
    /// Set while raw mode and the alternate screen are in use.
    pub(super) terminal_active: bool,
}

impl TerminalUI {
    pub fn new(
        store: Arc<LogStore>,
        device: DeviceInfo,
        source_name: String,
        auto_scroll: bool,
        event_rx: mpsc::UnboundedReceiver<UIEvent>,
        action_tx: mpsc::UnboundedSender<UIAction>,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Self {
        Self {
            state: ConsoleState::new(auto_scroll),
            store,
            device,
            source_name,
            event_rx,
            action_tx,
            clipboard,
            terminal_active: false,
        }
    }

    /// Runs the UI loop until the user quits or every event sender is gone.
    ///
    /// # Errors
    ///
    /// This function returns an error if the terminal cannot be set up or
    /// drawn to.
    pub async fn run(&mut self) -> Result<()> {
        self.initialize_terminal()?;

        debug!("Starting console UI loop");
        self.render()?;

        while let Some(event) = self.event_rx.recv().await {
            if let Err(e) = self.handle_event(event) {
                error!("Error handling UI event: {}", e);
            }
            if self.state.should_quit {
                break;
            }
            self.render()?;
        }

        debug!("Console UI loop finished");
        Ok(())
    }
}
