// Worker constants (no magic values)
use std::time::Duration;

/// Maximum attempts per URL before it is written to the failure log
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Delay between consecutive attempts on the same URL (2s)
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Sleep duration when the queue is empty or the pop failed (1s)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How long the dispatcher waits for in-flight workers on shutdown (5s)
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Number of entries served by the listing endpoint
pub const DEFAULT_LIST_LIMIT: usize = 10;
