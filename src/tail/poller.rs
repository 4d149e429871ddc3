//! Incremental tailing of a log source into the console store.
//!
//! The poller remembers how many source lines it has consumed (the
//! high-water mark) and only classifies lines past that mark on each poll.
use super::schedule::PeriodicTask;
use super::source::LogSource;
use crate::console::{classify, LogEntry, LogStore};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

pub const MISSING_NOTICE: &str = "No idevice logs found (Restart the app to continue reading)";

/// The effect of a single load or poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The store was rebuilt from a source holding `lines` lines.
    Loaded { lines: usize },
    /// `lines` new source lines were consumed.
    Appended { lines: usize },
    /// The source has no new lines.
    Unchanged,
    /// The source does not exist.
    Missing,
    /// The source could not be read; an error entry was recorded.
    Failed,
    /// Another load or poll was already running.
    Skipped,
}

/// Tails a `LogSource` into a `LogStore`.
pub struct TailPoller {
    source: Arc<dyn LogSource>,
    store: Arc<LogStore>,
    /// Number of source lines already consumed.
    high_water: AtomicUsize,
    /// Set while a load or poll is in flight.
    busy: AtomicBool,
}

impl TailPoller {
    pub fn new(source: Arc<dyn LogSource>, store: Arc<LogStore>) -> Self {
        Self {
            source,
            store,
            high_water: AtomicUsize::new(0),
            busy: AtomicBool::new(false),
        }
    }

    pub fn high_water_mark(&self) -> usize {
        self.high_water.load(Ordering::Acquire)
    }

    #[cfg(test)]
    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    /// Rebuilds the store from the source.
    ///
    /// Only the newest `max_size` lines of the source are kept. The total
    /// line count becomes the new high-water mark. A missing source records
    /// a single info entry; a read failure records a single error entry.
    pub async fn load_initial(&self) -> PollOutcome {
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            debug!("load skipped, tail already in progress");
            return PollOutcome::Skipped;
        };

        match self.source.read_lines().await {
            Ok(None) => {
                debug!(source = %self.source.describe(), "log source not found");
                self.store.add_info(MISSING_NOTICE);
                PollOutcome::Missing
            }
            Ok(Some(lines)) => {
                let total = lines.len();
                let start = total.saturating_sub(self.store.max_size());
                self.store.reset_with(classify_lines(&lines[start..]));
                self.high_water.store(total, Ordering::Release);
                debug!(total, retained = total - start, "loaded log source");
                PollOutcome::Loaded { lines: total }
            }
            Err(e) => {
                warn!("Failed to read idevice logs: {}", e);
                self.store.add_error(format!("Failed to read idevice logs: {}", e));
                PollOutcome::Failed
            }
        }
    }

    /// Appends any lines past the high-water mark.
    ///
    /// If the source shrank below the mark it was truncated or replaced, and
    /// tailing restarts from its first line.
    pub async fn poll(&self) -> PollOutcome {
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            trace!("poll skipped, tail already in progress");
            return PollOutcome::Skipped;
        };

        let lines = match self.source.read_lines().await {
            Ok(Some(lines)) => lines,
            Ok(None) => return PollOutcome::Missing,
            Err(e) => {
                warn!("Failed to read new logs: {}", e);
                self.store.add_error(format!("Failed to read new logs: {}", e));
                return PollOutcome::Failed;
            }
        };

        let total = lines.len();
        let mut mark = self.high_water_mark();
        if total < mark {
            warn!(total, mark, "log source shrank, restarting from the top");
            mark = 0;
        }
        if total == mark {
            self.high_water.store(total, Ordering::Release);
            return PollOutcome::Unchanged;
        }

        self.high_water.store(total, Ordering::Release);
        let appended = self.store.extend(classify_lines(&lines[mark..]));
        self.store.truncate_to(self.store.max_size());
        debug!(new_lines = total - mark, appended, "tailed new log lines");

        PollOutcome::Appended {
            lines: total - mark,
        }
    }

    /// Starts polling every `period` until the returned task is stopped.
    pub fn start_polling(self: &Arc<Self>, period: Duration) -> PeriodicTask {
        let poller = self.clone();
        PeriodicTask::start("tail-poll", period, move || {
            let poller = poller.clone();
            async move {
                let outcome = poller.poll().await;
                trace!(?outcome, "poll finished");
            }
        })
    }
}

fn classify_lines(lines: &[String]) -> Vec<LogEntry> {
    lines
        .iter()
        .filter_map(|line| classify(line).map(|severity| LogEntry::new(severity, line.as_str())))
        .collect()
}

/// Holds the busy flag for the duration of a load or poll.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
