// Redis QueueStore Implementation
//
// FIFO over a single list: RPUSH at the tail, LPOP at the head.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use relayq_core::domain::QueueItem;
use relayq_core::error::{AppError, Result};
use relayq_core::port::QueueStore;
use tokio::sync::OnceCell;
use tracing::debug;

pub const DEFAULT_QUEUE_KEY: &str = "urls";

// Helper to convert redis::RedisError to AppError with structured information
pub(crate) fn map_redis_error(err: redis::RedisError) -> AppError {
    if err.is_connection_refusal() {
        AppError::Queue(format!("Redis connection refused: {}", err))
    } else if err.is_timeout() {
        AppError::Queue(format!("Redis timeout: {}", err))
    } else if err.is_connection_dropped() || err.is_io_error() {
        AppError::Queue(format!("Redis connection lost: {}", err))
    } else {
        AppError::Queue(format!("Redis error [{:?}]: {}", err.kind(), err))
    }
}

/// Inclusive LRANGE bounds for `limit` items starting at `offset`
///
/// `None` when nothing should be read (LRANGE with stop = -1 would
/// return the whole list).
fn lrange_bounds(offset: usize, limit: usize) -> Option<(isize, isize)> {
    if limit == 0 {
        return None;
    }
    let start = isize::try_from(offset).ok()?;
    let stop = start.checked_add(isize::try_from(limit).ok()? - 1)?;
    Some((start, stop))
}

/// Queue store backed by one Redis list
///
/// Connects on first use. Until Redis is reachable every operation fails
/// with `AppError::Queue` and the next call tries again.
pub struct RedisQueueStore {
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
    key: String,
}

impl RedisQueueStore {
    pub fn new(client: redis::Client, key: impl Into<String>) -> Self {
        Self {
            client,
            conn: OnceCell::new(),
            key: key.into(),
        }
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let conn = self
            .conn
            .get_or_try_init(|| crate::connection::connect(&self.client))
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl QueueStore for RedisQueueStore {
    async fn push(&self, item: &QueueItem) -> Result<()> {
        let mut conn = self.connection().await?;
        let len: i64 = conn
            .rpush(&self.key, item.url())
            .await
            .map_err(map_redis_error)?;
        debug!(key = %self.key, len, "Pushed URL");
        Ok(())
    }

    async fn pop(&self) -> Result<Option<QueueItem>> {
        let mut conn = self.connection().await?;
        let url: Option<String> = conn
            .lpop(&self.key, None)
            .await
            .map_err(map_redis_error)?;
        Ok(url.map(QueueItem::from_stored))
    }

    async fn range(&self, offset: usize, limit: usize) -> Result<Vec<QueueItem>> {
        let Some((start, stop)) = lrange_bounds(offset, limit) else {
            return Ok(Vec::new());
        };
        let mut conn = self.connection().await?;
        let urls: Vec<String> = conn
            .lrange(&self.key, start, stop)
            .await
            .map_err(map_redis_error)?;
        Ok(urls.into_iter().map(QueueItem::from_stored).collect())
    }
}
