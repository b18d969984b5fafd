// Failure Sink Port

use crate::domain::FailureRecord;
use crate::error::Result;
use async_trait::async_trait;

/// Durable, append-only record of URLs that exhausted all attempts
///
/// Implementations:
/// - FileFailureSink: open-append-close per record (infra-system)
#[async_trait]
pub trait FailureSink: Send + Sync {
    /// Append one record
    ///
    /// Callers treat errors as best-effort: they are logged, never retried.
    async fn append(&self, record: &FailureRecord) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Failure sink that keeps records in memory
    #[derive(Default)]
    pub struct MemoryFailureSink {
        records: Mutex<Vec<FailureRecord>>,
        failing: AtomicBool,
    }

    impl MemoryFailureSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every append fail with an IO error
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn records(&self) -> Vec<FailureRecord> {
            self.records.lock().unwrap().clone()
        }

        pub fn len(&self) -> usize {
            self.records.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl FailureSink for MemoryFailureSink {
        async fn append(&self, record: &FailureRecord) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "failure log is read-only",
                )));
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }
}
