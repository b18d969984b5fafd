// Submission Service - accepting and listing queued URLs

use crate::application::worker::constants::DEFAULT_LIST_LIMIT;
use crate::domain::QueueItem;
use crate::error::Result;
use crate::port::QueueStore;
use std::sync::Arc;
use tracing::info;

/// Producer side of the queue, used by the HTTP API
pub struct SubmissionService {
    queue: Arc<dyn QueueStore>,
    list_limit: usize,
}

impl SubmissionService {
    pub fn new(queue: Arc<dyn QueueStore>) -> Self {
        Self {
            queue,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    pub fn with_list_limit(mut self, list_limit: usize) -> Self {
        self.list_limit = list_limit;
        self
    }

    /// Validate and push a URL onto the tail of the queue
    ///
    /// # Errors
    /// - `AppError::Domain` if the URL is blank
    /// - `AppError::Queue` if the store rejects the push
    pub async fn submit(&self, url: &str) -> Result<QueueItem> {
        let item = QueueItem::new(url)?;
        self.queue.push(&item).await?;
        info!(url = %item, "URL saved to queue");
        Ok(item)
    }

    /// The oldest pending URLs, up to the list limit
    pub async fn pending(&self) -> Result<Vec<QueueItem>> {
        self.queue.range(0, self.list_limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::port::queue_store::mocks::InMemoryQueueStore;

    #[tokio::test]
    async fn test_submit_pushes_to_tail() {
        let store = Arc::new(InMemoryQueueStore::with_urls(["http://first.test"]));
        let service = SubmissionService::new(store.clone());

        let item = service.submit(" http://second.test ").await.unwrap();
        assert_eq!(item.url(), "http://second.test");

        let pending: Vec<_> = service
            .pending()
            .await
            .unwrap()
            .into_iter()
            .map(QueueItem::into_url)
            .collect();
        assert_eq!(pending, vec!["http://first.test", "http://second.test"]);
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_url() {
        let store = Arc::new(InMemoryQueueStore::new());
        let service = SubmissionService::new(store.clone());

        let err = service.submit("").await.unwrap_err();
        assert!(matches!(err, AppError::Domain(_)));
        assert!(err.is_client_error());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_are_independent() {
        let store = Arc::new(InMemoryQueueStore::new());
        let service = SubmissionService::new(store.clone());

        service.submit("http://dup.test").await.unwrap();
        service.submit("http://dup.test").await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_pending_respects_limit() {
        let urls: Vec<String> = (0..15).map(|i| format!("http://{}.test", i)).collect();
        let store = Arc::new(InMemoryQueueStore::with_urls(urls));
        let service = SubmissionService::new(store.clone());

        let pending = service.pending().await.unwrap();
        assert_eq!(pending.len(), 10);
        assert_eq!(pending[0].url(), "http://0.test");

        let service = SubmissionService::new(store).with_list_limit(3);
        assert_eq!(service.pending().await.unwrap().len(), 3);
    }
}
