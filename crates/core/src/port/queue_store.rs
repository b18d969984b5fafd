// Queue Store Port (Interface)

use crate::domain::QueueItem;
use crate::error::Result;
use async_trait::async_trait;

/// Shared ordered list of pending URLs (FIFO)
///
/// Each operation is atomic on its own; there are no multi-operation
/// transactions. Implementations are shared by reference across the API
/// (producer) and the Dispatcher (sole consumer).
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Append an item at the tail
    async fn push(&self, item: &QueueItem) -> Result<()>;

    /// Remove and return the head item, `None` when the queue is empty
    ///
    /// Must be atomic: no two callers ever observe the same item.
    async fn pop(&self) -> Result<Option<QueueItem>>;

    /// Read up to `limit` items starting at `offset` from the head, without removing them
    async fn range(&self, offset: usize, limit: usize) -> Result<Vec<QueueItem>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory queue store that records pop order and can inject pop errors
    #[derive(Default)]
    pub struct InMemoryQueueStore {
        items: Mutex<VecDeque<QueueItem>>,
        popped: Mutex<Vec<QueueItem>>,
        pop_calls: AtomicUsize,
        failing_pops: AtomicUsize,
    }

    impl InMemoryQueueStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_urls<I, S>(urls: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let store = Self::new();
            let items = urls.into_iter().map(|u| QueueItem::from_stored(u.into()));
            store.items.lock().unwrap().extend(items);
            store
        }

        /// Make the next `n` pops fail with a queue store error
        pub fn fail_next_pops(&self, n: usize) {
            self.failing_pops.store(n, Ordering::SeqCst);
        }

        /// Items handed out by `pop`, in order
        pub fn popped(&self) -> Vec<QueueItem> {
            self.popped.lock().unwrap().clone()
        }

        /// Number of `pop` calls, including empty and failed ones
        pub fn pop_calls(&self) -> usize {
            self.pop_calls.load(Ordering::SeqCst)
        }

        pub fn len(&self) -> usize {
            self.items.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl QueueStore for InMemoryQueueStore {
        async fn push(&self, item: &QueueItem) -> Result<()> {
            self.items.lock().unwrap().push_back(item.clone());
            Ok(())
        }

        async fn pop(&self) -> Result<Option<QueueItem>> {
            self.pop_calls.fetch_add(1, Ordering::SeqCst);

            let failing = self.failing_pops.load(Ordering::SeqCst);
            if failing > 0 {
                self.failing_pops.store(failing - 1, Ordering::SeqCst);
                return Err(AppError::Queue("connection refused".to_string()));
            }

            let item = self.items.lock().unwrap().pop_front();
            if let Some(item) = &item {
                self.popped.lock().unwrap().push(item.clone());
            }
            Ok(item)
        }

        async fn range(&self, offset: usize, limit: usize) -> Result<Vec<QueueItem>> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect())
        }
    }
}
