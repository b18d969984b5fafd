// Port Layer - Interfaces for external dependencies

pub mod failure_sink;
pub mod id_provider; // For deterministic testing
pub mod queue_store;
pub mod time_provider;
pub mod url_caller;

// Re-exports
pub use failure_sink::FailureSink;
pub use id_provider::IdProvider;
pub use queue_store::QueueStore;
pub use time_provider::TimeProvider;
pub use url_caller::{CallResponse, TransportError, UrlCaller};
