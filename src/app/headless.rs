//! The non-interactive modes: a one-shot `dump` and a streaming `follow`.
use super::config::Settings;
use super::setup::print_start_banner;
use crate::console::{copy_all_text, LogStore};
use crate::tail::{FileSource, TailPoller};
use crate::ui::render::entry_line;
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

fn build_poller(settings: &Settings) -> (Arc<LogStore>, Arc<TailPoller>) {
    let store = Arc::new(LogStore::new(settings.max_entries));
    let source = Arc::new(FileSource::new(&settings.log_file));
    let poller = Arc::new(TailPoller::new(source, store.clone()));
    (store, poller)
}

/// Loads the log once and prints the copy-all text to stdout.
pub async fn dump(settings: &Settings) -> Result<()> {
    let (store, poller) = build_poller(settings);
    let outcome = poller.load_initial().await;
    debug!(?outcome, "Dump load finished");

    let text = copy_all_text(&settings.device, &store.snapshot());
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text).context("could not write to stdout")?;
    Ok(())
}

/// Prints every entry, then keeps polling and printing new entries until
/// Ctrl+C.
pub async fn follow(settings: &Settings) -> Result<()> {
    if !settings.color {
        colored::control::set_override(false);
    }
    print_start_banner(settings);

    let (store, poller) = build_poller(settings);
    let mut changes = store.subscribe();

    poller.load_initial().await;
    let mut last_printed = print_after(&store, None)?;

    let mut poll_task = poller.start_polling(settings.poll_interval);
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);
    loop {
        tokio::select! {
            _ = &mut interrupted => {
                info!("Interrupted, stopping follow");
                break;
            }
            change = changes.recv() => match change {
                Some(change) => {
                    debug!(?change, "Store changed");
                    last_printed = print_after(&store, last_printed)?;
                }
                None => break,
            }
        }
    }

    poll_task.stop().await;
    Ok(())
}

/// Prints the entries newer than `after` and returns the id of the newest
/// printed entry.
fn print_after(store: &LogStore, after: Option<Uuid>) -> Result<Option<Uuid>> {
    let entries = store.entries_after(after);
    if entries.is_empty() {
        return Ok(after);
    }

    let mut stdout = std::io::stdout().lock();
    for entry in &entries {
        writeln!(stdout, "{}", entry_line(entry).to_ansi())
            .context("could not write to stdout")?;
    }
    stdout.flush().context("could not write to stdout")?;

    Ok(entries.last().map(|entry| entry.id))
}
