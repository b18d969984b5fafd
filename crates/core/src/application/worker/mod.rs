// Worker - per-item bounded retry protocol

pub mod constants;
mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::failure_recorder::FailureReporter;
use crate::application::retry::{RetryDecision, RetryPolicy};
use crate::domain::{DeliveryOutcome, FailureRecord, QueueItem};
use crate::port::{TimeProvider, UrlCaller};
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Delivers one URL at a time with bounded retries
///
/// Cheap to clone: one clone is moved into every spawned delivery task.
/// Workers share nothing mutable except the failure reporter channel.
#[derive(Clone)]
pub struct Worker {
    caller: Arc<dyn UrlCaller>,
    retry_policy: Arc<RetryPolicy>,
    failures: FailureReporter,
    time_provider: Arc<dyn TimeProvider>,
}

impl Worker {
    pub fn new(
        caller: Arc<dyn UrlCaller>,
        retry_policy: Arc<RetryPolicy>,
        failures: FailureReporter,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            caller,
            retry_policy,
            failures,
            time_provider,
        }
    }

    /// Attempt delivery of `item` until success or exhaustion
    ///
    /// On exhaustion exactly one failure record is reported. A shutdown
    /// signal interrupts the delay between attempts (never an in-flight
    /// call) and abandons the item without recording it.
    pub async fn deliver(&self, item: QueueItem, mut shutdown: ShutdownToken) -> DeliveryOutcome {
        let max_attempts = self.retry_policy.max_attempts();
        let mut attempt = 1;

        loop {
            match self.caller.call(item.url()).await {
                Ok(response) if self.retry_policy.accepts(&response) => {
                    info!(
                        url = %item,
                        attempt,
                        status = response.status,
                        "URL called successfully"
                    );
                    return DeliveryOutcome::Succeeded {
                        attempts: attempt,
                        status: response.status,
                    };
                }
                Ok(response) => {
                    warn!(
                        url = %item,
                        attempt,
                        max_attempts,
                        status = response.status,
                        "URL answered with non-success status"
                    );
                }
                Err(e) => {
                    warn!(
                        url = %item,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Failed to call URL"
                    );
                }
            }

            match self.retry_policy.after_failure(attempt) {
                RetryDecision::Retry(delay) => {
                    tokio::select! {
                        _ = sleep(delay) => {},
                        _ = shutdown.wait() => {
                            warn!(
                                url = %item,
                                attempts = attempt,
                                "Delivery abandoned on shutdown"
                            );
                            return DeliveryOutcome::Abandoned { attempts: attempt };
                        }
                    }
                    attempt += 1;
                }
                RetryDecision::Exhausted => break,
            }
        }

        error!(url = %item, attempts = attempt, "Failed to call URL after all attempts");
        let record = FailureRecord::new(item.into_url(), attempt, self.time_provider.now_millis());
        self.failures.report(record);

        DeliveryOutcome::Exhausted { attempts: attempt }
    }
}
