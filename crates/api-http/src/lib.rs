//! HTTP API Layer
//!
//! Accepts URL submissions into the queue and lists pending entries.
//! Everything here only translates HTTP to `SubmissionService` calls.

pub mod error;
pub mod handler;
pub mod rate_limiter;
pub mod server;
pub mod types;

pub use server::{ApiServer, ApiServerConfig};
