//! A fixed-interval task runner with start/stop and a no-overlap guard.
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, trace};

/// Runs a job every `period` on the tokio runtime until stopped.
///
/// The first run happens one period after `start`. A tick that fires while
/// the previous run is still in flight is skipped.
pub struct PeriodicTask {
    name: &'static str,
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    /// Starts the task.
    ///
    /// # Arguments
    ///
    /// * `name` - Used in log output.
    /// * `period` - The time between runs.
    /// * `job` - Produces the future to run on each tick.
    pub fn start<F, Fut>(name: &'static str, period: Duration, mut job: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let in_flight = Arc::new(AtomicBool::new(false));

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await; // The first tick completes immediately.

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        if in_flight.swap(true, Ordering::AcqRel) {
                            trace!(task = name, "previous run still in flight, skipping tick");
                            continue;
                        }

                        let run = job();
                        let in_flight = in_flight.clone();
                        tokio::spawn(async move {
                            run.await;
                            in_flight.store(false, Ordering::Release);
                        });
                    }
                }
            }

            debug!(task = name, "periodic task stopped");
        });

        debug!(task = name, ?period, "periodic task started");
        Self {
            name,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    #[cfg(test)]
    fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Stops scheduling new runs. A run already in flight is left to finish.
    pub async fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                debug!(task = self.name, "periodic task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
