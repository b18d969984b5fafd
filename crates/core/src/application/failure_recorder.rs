// Failure Recorder - single owner of the failure sink
//
// Workers never touch the sink directly: they send records over a channel
// and a dedicated task appends them one at a time.

use crate::domain::FailureRecord;
use crate::port::FailureSink;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Sending half, cloned into every worker
#[derive(Clone)]
pub struct FailureReporter {
    tx: mpsc::UnboundedSender<FailureRecord>,
}

impl FailureReporter {
    /// Hand a record to the recorder without waiting for the write
    ///
    /// If the recorder has already stopped the record is logged and dropped.
    pub fn report(&self, record: FailureRecord) {
        if let Err(mpsc::error::SendError(record)) = self.tx.send(record) {
            error!(
                url = %record.url,
                attempts = record.attempts,
                "Failure recorder stopped, dropping failure record"
            );
        }
    }
}

/// Receiving half, owns the sink
pub struct FailureRecorder {
    sink: Arc<dyn FailureSink>,
    rx: mpsc::UnboundedReceiver<FailureRecord>,
}

/// Create a reporter/recorder pair around `sink`
pub fn failure_channel(sink: Arc<dyn FailureSink>) -> (FailureReporter, FailureRecorder) {
    let (tx, rx) = mpsc::unbounded_channel();
    (FailureReporter { tx }, FailureRecorder { sink, rx })
}

impl FailureRecorder {
    /// Append records until every reporter is dropped
    ///
    /// Returns the number of records written. Sink errors are logged and
    /// the record is dropped.
    pub async fn run(mut self) -> usize {
        let mut written = 0;
        while let Some(record) = self.rx.recv().await {
            match self.sink.append(&record).await {
                Ok(()) => {
                    written += 1;
                    info!(
                        url = %record.url,
                        attempts = record.attempts,
                        "Failure recorded"
                    );
                }
                Err(e) => {
                    error!(
                        url = %record.url,
                        attempts = record.attempts,
                        error = %e,
                        "Failed to write failure log"
                    );
                }
            }
        }
        info!(written, "Failure recorder stopped");
        written
    }

    /// Run on its own task
    pub fn spawn(self) -> JoinHandle<usize> {
        tokio::spawn(self.run())
    }
}
