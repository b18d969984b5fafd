// Application Layer - Use Cases and Business Logic

pub mod dispatcher;
pub mod failure_recorder;
pub mod retry;
pub mod submission;
pub mod worker;

// Re-exports
pub use dispatcher::{DispatchStats, Dispatcher, DispatcherConfig};
pub use failure_recorder::{failure_channel, FailureRecorder, FailureReporter};
pub use retry::{RetryDecision, RetryPolicy, SuccessCriterion};
pub use submission::SubmissionService;
pub use worker::{shutdown_channel, ShutdownSender, ShutdownToken, Worker};
