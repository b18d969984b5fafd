// Dispatcher - drains the queue and fans out one worker per item

use crate::application::worker::constants::{DEFAULT_DRAIN_TIMEOUT, DEFAULT_POLL_INTERVAL};
use crate::application::worker::{ShutdownToken, Worker};
use crate::domain::QueueItem;
use crate::port::{IdProvider, QueueStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio::time::{sleep, timeout};
use tracing::{error, info, info_span, warn, Instrument};

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Pause after an empty pop or a pop error
    pub poll_interval: Duration,
    /// Cap on concurrently running workers, `None` for unbounded
    pub max_in_flight: Option<usize>,
    /// How long to wait for in-flight workers after shutdown
    pub drain_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_in_flight: None,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }
}

/// Counters returned when the dispatcher stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub popped: u64,
    pub idle_polls: u64,
    pub pop_errors: u64,
    pub panicked_workers: u64,
}

/// Single consumer of the queue store
///
/// Pops one item at a time and spawns an independent delivery task for
/// it without waiting for the result. Store errors are logged and never
/// stop the loop.
pub struct Dispatcher {
    queue: Arc<dyn QueueStore>,
    worker: Worker,
    id_provider: Arc<dyn IdProvider>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(
        queue: Arc<dyn QueueStore>,
        worker: Worker,
        id_provider: Arc<dyn IdProvider>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            queue,
            worker,
            id_provider,
            config,
        }
    }

    /// Run the drain loop until shutdown
    pub async fn run(&self, mut shutdown: ShutdownToken) -> DispatchStats {
        info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            max_in_flight = ?self.config.max_in_flight,
            "Dispatcher started"
        );

        let limiter = self.config.max_in_flight.map(|n| Arc::new(Semaphore::new(n)));
        let mut workers = JoinSet::new();
        let mut stats = DispatchStats::default();

        loop {
            if shutdown.is_shutdown() {
                break;
            }
            Self::reap_finished(&mut workers, &mut stats);

            // Wait for capacity before popping so items stay queued meanwhile
            let permit = match &limiter {
                Some(semaphore) => {
                    tokio::select! {
                        permit = Arc::clone(semaphore).acquire_owned() => match permit {
                            Ok(permit) => Some(permit),
                            Err(_) => break,
                        },
                        _ = shutdown.wait() => break,
                    }
                }
                None => None,
            };

            match self.queue.pop().await {
                Ok(Some(item)) => {
                    stats.popped += 1;
                    self.spawn_delivery(&mut workers, item, permit, shutdown.clone());
                }
                Ok(None) => {
                    stats.idle_polls += 1;
                    if !self.pause(&mut shutdown).await {
                        break;
                    }
                }
                Err(e) => {
                    stats.pop_errors += 1;
                    error!(error = %e, "Failed to pop URL from queue");
                    if !self.pause(&mut shutdown).await {
                        break;
                    }
                }
            }
        }

        info!(in_flight = workers.len(), "Dispatcher stopping, draining workers");
        self.drain(&mut workers, &mut stats).await;
        info!(
            popped = stats.popped,
            pop_errors = stats.pop_errors,
            "Dispatcher stopped"
        );
        stats
    }

    fn spawn_delivery(
        &self,
        workers: &mut JoinSet<()>,
        item: QueueItem,
        permit: Option<OwnedSemaphorePermit>,
        shutdown: ShutdownToken,
    ) {
        let dispatch_id = self.id_provider.generate_id();
        let span = info_span!("delivery", dispatch_id = %dispatch_id, url = %item);
        let worker = self.worker.clone();

        workers.spawn(
            async move {
                // Held until delivery finishes
                let _permit = permit;
                worker.deliver(item, shutdown).await;
            }
            .instrument(span),
        );
    }

    /// Sleep one poll interval; false if shutdown arrived first
    async fn pause(&self, shutdown: &mut ShutdownToken) -> bool {
        tokio::select! {
            _ = sleep(self.config.poll_interval) => true,
            _ = shutdown.wait() => false,
        }
    }

    fn reap_finished(workers: &mut JoinSet<()>, stats: &mut DispatchStats) {
        while let Some(result) = workers.try_join_next() {
            Self::log_join_error(result, stats);
        }
    }

    async fn drain(&self, workers: &mut JoinSet<()>, stats: &mut DispatchStats) {
        let joined = timeout(self.config.drain_timeout, async {
            while let Some(result) = workers.join_next().await {
                Self::log_join_error(result, stats);
            }
        })
        .await;

        if joined.is_err() {
            warn!(
                remaining = workers.len(),
                "Drain timeout reached, aborting in-flight workers"
            );
            workers.shutdown().await;
        }
    }

    fn log_join_error(result: Result<(), tokio::task::JoinError>, stats: &mut DispatchStats) {
        if let Err(join_err) = result {
            if join_err.is_panic() {
                stats.panicked_workers += 1;
                error!("Worker panicked: {:?}", join_err);
            } else {
                warn!("Worker cancelled: {:?}", join_err);
            }
        }
    }
}
