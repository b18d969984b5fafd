// relayq Infrastructure - Redis Adapter
// Implements: QueueStore over a Redis list

mod connection;
mod queue_store;

pub use connection::{open_client, redis_url, DEFAULT_REDIS_ADDR};
pub use queue_store::{RedisQueueStore, DEFAULT_QUEUE_KEY};

// Note: redis::RedisError conversion is handled by a helper function
// due to Rust's orphan rules (cannot implement From<redis::RedisError> for AppError here)
