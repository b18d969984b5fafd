// Delivery outcome and failure log entries

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout of failure log lines ("2026/10/18 12:00:00")
const LOG_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Terminal result of one Worker invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// A response was received on attempt `attempts`
    Succeeded { attempts: u32, status: u16 },
    /// Every attempt failed; a failure record was reported
    Exhausted { attempts: u32 },
    /// Shutdown interrupted the retry delay after `attempts` attempts
    Abandoned { attempts: u32 },
}

impl DeliveryOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            DeliveryOutcome::Succeeded { attempts, .. }
            | DeliveryOutcome::Exhausted { attempts }
            | DeliveryOutcome::Abandoned { attempts } => *attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Succeeded { .. })
    }
}

/// One entry in the failure log: a URL that exhausted all attempts.
///
/// Created once per exhausted item, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub url: String,
    pub attempts: u32,
    pub failed_at: i64, // epoch ms
}

impl FailureRecord {
    pub fn new(url: impl Into<String>, attempts: u32, failed_at: i64) -> Self {
        Self {
            url: url.into(),
            attempts,
            failed_at,
        }
    }

    /// Render as a single log line (no trailing newline)
    pub fn to_log_line(&self) -> String {
        let timestamp = Utc
            .timestamp_millis_opt(self.failed_at)
            .single()
            .map(|t: DateTime<Utc>| t.format(LOG_TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| self.failed_at.to_string());

        format!(
            "{} failed to call URL {} after {} attempts",
            timestamp, self.url, self.attempts
        )
    }
}
