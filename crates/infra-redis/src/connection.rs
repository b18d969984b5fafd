// Redis connection setup

use redis::aio::ConnectionManager;
use relayq_core::error::{AppError, Result};
use tracing::info;

pub const DEFAULT_REDIS_ADDR: &str = "localhost:6379";

// Manager (re)connect backoff: a single attempt per call
const RECONNECT_EXPONENT_BASE: u64 = 2;
const RECONNECT_FACTOR_MS: u64 = 100;
const RECONNECT_RETRIES: usize = 0;

/// Build a connection URL from a `host:port` address and a database index
pub fn redis_url(addr: &str, db: i64) -> String {
    format!("redis://{}/{}", addr, db)
}

/// Parse `url` into a client without touching the network
///
/// # Errors
/// `AppError::Config` if the URL is malformed
pub fn open_client(url: &str) -> Result<redis::Client> {
    redis::Client::open(url)
        .map_err(|e| AppError::Config(format!("Invalid Redis URL {}: {}", url, e)))
}

/// Open an auto-reconnecting connection
///
/// The returned manager is cheap to clone and is meant to live for the
/// whole process.
pub(crate) async fn connect(client: &redis::Client) -> Result<ConnectionManager> {
    let manager = client
        .get_connection_manager_with_backoff(
            RECONNECT_EXPONENT_BASE,
            RECONNECT_FACTOR_MS,
            RECONNECT_RETRIES,
        )
        .await
        .map_err(crate::queue_store::map_redis_error)?;

    info!(addr = %client.get_connection_info().addr, "Connected to Redis");
    Ok(manager)
}
