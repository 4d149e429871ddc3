//! This module provides the capped, in-memory store behind the console.
//!
//! The `LogStore` is created once per console session and handed to every
//! component that needs it. Writers append entries; readers take snapshots
//! and subscribe to change notifications to know when to redraw.
use super::entry::{LogEntry, Severity};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::trace;
use uuid::Uuid;

/// The default number of entries kept before the oldest are evicted.
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// A change notification published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    /// This many entries were appended at the end.
    Appended(usize),
    /// This many entries were evicted from the front.
    Evicted(usize),
    /// The store content was replaced wholesale.
    Reset,
    /// The store was emptied.
    Cleared,
}

/// An insertion-ordered store of console entries, capped at `max_size`.
pub struct LogStore {
    /// The entries, oldest first.
    entries: Mutex<VecDeque<LogEntry>>,
    /// The maximum number of entries retained.
    max_size: usize,
    /// Open subscriber channels.
    subscribers: Mutex<Vec<mpsc::UnboundedSender<StoreChange>>>,
}

impl LogStore {
    /// Creates an empty store.
    ///
    /// # Arguments
    ///
    /// * `max_size` - The maximum number of entries to keep. Values below 1
    ///   are raised to 1.
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(max_size)),
            max_size,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Registers a new subscriber.
    ///
    /// Every mutation that changes the content is published on the returned
    /// channel. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<StoreChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.subscribers).push(tx);
        rx
    }

    /// Appends a new entry with the given severity and returns a copy of it.
    pub fn add(&self, severity: Severity, message: impl Into<String>) -> LogEntry {
        let entry = LogEntry::new(severity, message);
        self.extend(std::iter::once(entry.clone()));
        entry
    }

    pub fn add_info(&self, message: impl Into<String>) -> LogEntry {
        self.add(Severity::Info, message)
    }

    pub fn add_error(&self, message: impl Into<String>) -> LogEntry {
        self.add(Severity::Error, message)
    }

    /// Appends a batch of entries, evicting the oldest if the cap is exceeded.
    ///
    /// Returns the number of entries appended.
    pub fn extend(&self, batch: impl IntoIterator<Item = LogEntry>) -> usize {
        let (appended, evicted) = {
            let mut entries = lock(&self.entries);
            let before = entries.len();
            entries.extend(batch);
            let appended = entries.len() - before;
            let evicted = evict_front(&mut entries, self.max_size);
            (appended, evicted)
        };

        if appended > 0 {
            self.notify(StoreChange::Appended(appended));
        }
        if evicted > 0 {
            self.notify(StoreChange::Evicted(evicted));
        }
        appended
    }

    /// Replaces the whole content with `batch`, keeping only the newest
    /// `max_size` entries.
    pub fn reset_with(&self, batch: impl IntoIterator<Item = LogEntry>) {
        {
            let mut entries = lock(&self.entries);
            entries.clear();
            entries.extend(batch);
            evict_front(&mut entries, self.max_size);
        }
        self.notify(StoreChange::Reset);
    }

    /// Removes every entry.
    pub fn clear(&self) {
        lock(&self.entries).clear();
        self.notify(StoreChange::Cleared);
    }

    /// Removes up to `count` entries from the front and returns how many
    /// were removed.
    pub fn remove_oldest(&self, count: usize) -> usize {
        let removed = {
            let mut entries = lock(&self.entries);
            let removed = count.min(entries.len());
            entries.drain(..removed);
            removed
        };

        if removed > 0 {
            self.notify(StoreChange::Evicted(removed));
        }
        removed
    }

    /// Evicts the oldest entries until at most `limit` remain.
    pub fn truncate_to(&self, limit: usize) -> usize {
        let excess = self.len().saturating_sub(limit);
        self.remove_oldest(excess)
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Counts entries classified as errors.
    pub fn error_count(&self) -> usize {
        lock(&self.entries)
            .iter()
            .filter(|entry| entry.severity == Severity::Error)
            .count()
    }

    /// Returns a copy of the entries, oldest first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        lock(&self.entries).iter().cloned().collect()
    }

    /// Returns copies of the entries that follow the entry with id `after`.
    ///
    /// If `after` is `None` or no longer in the store, every entry is
    /// returned.
    pub fn entries_after(&self, after: Option<Uuid>) -> Vec<LogEntry> {
        let entries = lock(&self.entries);
        let start = after
            .and_then(|id| entries.iter().position(|entry| entry.id == id))
            .map(|index| index + 1)
            .unwrap_or(0);
        entries.iter().skip(start).cloned().collect()
    }

    fn notify(&self, change: StoreChange) {
        let mut subscribers = lock(&self.subscribers);
        subscribers.retain(|tx| tx.send(change).is_ok());
        trace!(?change, subscribers = subscribers.len(), "store changed");
    }
}

fn evict_front(entries: &mut VecDeque<LogEntry>, max_size: usize) -> usize {
    let excess = entries.len().saturating_sub(max_size);
    entries.drain(..excess);
    excess
}

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
