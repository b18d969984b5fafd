// Retry policy for per-item delivery
use crate::application::worker::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_INTERVAL};
use crate::domain::DomainError;
use crate::port::CallResponse;
use std::str::FromStr;
use std::time::Duration;

/// What counts as a successful attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuccessCriterion {
    /// Any received response, whatever its status
    #[default]
    AnyResponse,
    /// Only 2xx responses; anything else is retried like a transport error
    Status2xx,
}

impl FromStr for SuccessCriterion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(SuccessCriterion::AnyResponse),
            "2xx" => Ok(SuccessCriterion::Status2xx),
            other => Err(DomainError::ValidationError(format!(
                "unknown success criterion '{}' (expected 'any' or '2xx')",
                other
            ))),
        }
    }
}

/// Retry decision after a failed attempt
#[derive(Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait this long, then attempt again
    Retry(Duration),
    /// No attempts left
    Exhausted,
}

/// Fixed-interval, bounded retry policy
///
/// An item is attempted at most `max_attempts` times with `retry_interval`
/// between consecutive attempts (so `max_attempts - 1` delays in the worst case).
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    retry_interval: Duration,
    success_criterion: SuccessCriterion,
}

impl RetryPolicy {
    /// Create a new retry policy
    ///
    /// # Errors
    /// `DomainError::InvalidRetryConfig` if `max_attempts` is zero
    pub fn new(max_attempts: u32, retry_interval: Duration) -> Result<Self, DomainError> {
        if max_attempts == 0 {
            return Err(DomainError::InvalidRetryConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_attempts,
            retry_interval,
            success_criterion: SuccessCriterion::default(),
        })
    }

    pub fn with_success_criterion(mut self, criterion: SuccessCriterion) -> Self {
        self.success_criterion = criterion;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    pub fn success_criterion(&self) -> SuccessCriterion {
        self.success_criterion
    }

    /// Whether a received response ends delivery successfully
    pub fn accepts(&self, response: &CallResponse) -> bool {
        match self.success_criterion {
            SuccessCriterion::AnyResponse => true,
            SuccessCriterion::Status2xx => response.is_success_status(),
        }
    }

    /// Decide what happens after attempt number `attempt` (1-based) failed
    pub fn after_failure(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::Exhausted;
        }
        RetryDecision::Retry(self.retry_interval)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            success_criterion: SuccessCriterion::default(),
        }
    }
}
