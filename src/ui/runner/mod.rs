use super::clipboard::Osc52Clipboard;
use super::{TerminalUI, UIAction, UIEvent};
use crate::app::Settings;
use crate::console::LogStore;
use crate::tail::{FileSource, TailPoller};
use anyhow::Result;
use crossterm::event::{self, Event};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Runs the interactive console until the user quits.
///
/// Activating the view loads the source and starts the poll timer;
/// leaving it stops the timer again.
pub async fn run_console(settings: Settings) -> Result<()> {
    info!(source = %settings.log_file.display(), "Starting console");

    let store = Arc::new(LogStore::new(settings.max_entries));
    let source = Arc::new(FileSource::new(&settings.log_file));
    let poller = Arc::new(TailPoller::new(source, store.clone()));

    let (ui_event_tx, ui_event_rx) = mpsc::unbounded_channel::<UIEvent>();
    let (ui_action_tx, mut ui_action_rx) = mpsc::unbounded_channel::<UIAction>();

    // Forward store changes so the view redraws.
    let mut changes = store.subscribe();
    let ui_event_tx_store = ui_event_tx.clone();
    tokio::spawn(async move {
        while let Some(change) = changes.recv().await {
            if ui_event_tx_store.send(UIEvent::Store(change)).is_err() {
                break;
            }
        }
    });

    // Terminal input is read on a blocking thread; it exits once the UI
    // drops its receiver.
    let ui_event_tx_input = ui_event_tx.clone();
    tokio::task::spawn_blocking(move || {
        while !ui_event_tx_input.is_closed() {
            if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                continue;
            }
            let forwarded = match event::read() {
                Ok(Event::Key(key_event)) => ui_event_tx_input.send(UIEvent::KeyPress(key_event)),
                Ok(Event::Resize(width, height)) => {
                    ui_event_tx_input.send(UIEvent::Resize(width, height))
                }
                _ => Ok(()),
            };
            if let Err(e) = forwarded {
                debug!("Failed to send terminal event: {}", e);
                break;
            }
        }
    });
    drop(ui_event_tx);

    let poller_actions = poller.clone();
    let store_actions = store.clone();
    tokio::spawn(async move {
        while let Some(action) = ui_action_rx.recv().await {
            match action {
                UIAction::Refresh => {
                    let outcome = poller_actions.load_initial().await;
                    debug!(?outcome, "Manual refresh finished");
                }
                UIAction::Clear => store_actions.clear(),
            }
        }
    });

    let mut terminal_ui = TerminalUI::new(
        store.clone(),
        settings.device.clone(),
        poller.source_name(),
        settings.auto_scroll,
        ui_event_rx,
        ui_action_tx,
        Box::new(Osc52Clipboard::new(std::io::stdout())),
    );

    // Activate: initial load in the background, then periodic polling.
    let initial = poller.clone();
    tokio::spawn(async move {
        let outcome = initial.load_initial().await;
        info!(?outcome, "Initial log load finished");
    });
    let mut poll_task = poller.start_polling(settings.poll_interval);

    let result = terminal_ui.run().await;

    poll_task.stop().await;
    drop(terminal_ui);
    info!("Console closed");
    result
}
