// relayq Infrastructure - System Adapters
// Implements: UrlCaller (outbound GET), FailureSink (append-only file)

pub mod file_failure_sink;
pub mod http_caller;

pub use file_failure_sink::{FileFailureSink, DEFAULT_FAILURE_LOG};
pub use http_caller::HttpUrlCaller;
