// Url Caller Port
// Abstraction for the single-shot outbound GET issued per attempt

use async_trait::async_trait;
use thiserror::Error;

/// A response was received (body already released)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallResponse {
    pub status: u16,
}

impl CallResponse {
    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failures: no response was received.
///
/// The variants only make logs more useful; the retry protocol treats
/// them all the same.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Request failed: {0}")]
    Request(String),
}

/// Outbound call trait
///
/// Implementations:
/// - HttpUrlCaller: reqwest GET (infra-system)
#[async_trait]
pub trait UrlCaller: Send + Sync {
    /// Issue one GET to `url`
    ///
    /// # Errors
    /// - TransportError when no response could be obtained
    async fn call(&self, url: &str) -> Result<CallResponse, TransportError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted behavior for a URL
    #[derive(Debug, Clone)]
    pub enum CallScript {
        /// Always respond with status
        Respond(u16),
        /// Always fail at the transport level
        Fail,
        /// Fail `failures` times, then respond with status
        FailThenRespond { failures: u32, status: u16 },
    }

    /// Url caller driven by per-URL scripts, recording every call
    pub struct ScriptedUrlCaller {
        scripts: HashMap<String, CallScript>,
        fallback: CallScript,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedUrlCaller {
        /// Every URL without a script gets `fallback`
        pub fn new(fallback: CallScript) -> Self {
            Self {
                scripts: HashMap::new(),
                fallback,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn new_success() -> Self {
            Self::new(CallScript::Respond(200))
        }

        pub fn new_fail() -> Self {
            Self::new(CallScript::Fail)
        }

        pub fn with_script(mut self, url: impl Into<String>, script: CallScript) -> Self {
            self.scripts.insert(url.into(), script);
            self
        }

        pub fn calls_for(&self, url: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl UrlCaller for ScriptedUrlCaller {
        async fn call(&self, url: &str) -> Result<CallResponse, TransportError> {
            // Attempt number for this URL, 1-based
            let attempt = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(url.to_string());
                calls.iter().filter(|u| *u == url).count() as u32
            };

            let script = self.scripts.get(url).unwrap_or(&self.fallback);
            match script {
                CallScript::Respond(status) => Ok(CallResponse { status: *status }),
                CallScript::Fail => Err(TransportError::Connect(format!(
                    "connection refused: {}",
                    url
                ))),
                CallScript::FailThenRespond { failures, status } => {
                    if attempt <= *failures {
                        Err(TransportError::Connect(format!(
                            "connection refused: {}",
                            url
                        )))
                    } else {
                        Ok(CallResponse { status: *status })
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::{CallScript, ScriptedUrlCaller};
    use super::*;

    #[test]
    fn test_success_status_range() {
        assert!(CallResponse { status: 200 }.is_success_status());
        assert!(CallResponse { status: 204 }.is_success_status());
        assert!(!CallResponse { status: 302 }.is_success_status());
        assert!(!CallResponse { status: 500 }.is_success_status());
    }

    #[tokio::test]
    async fn test_scripted_fail_then_respond() {
        let caller = ScriptedUrlCaller::new_success().with_script(
            "http://flaky.test",
            CallScript::FailThenRespond {
                failures: 2,
                status: 200,
            },
        );

        assert!(caller.call("http://flaky.test").await.is_err());
        assert!(caller.call("http://flaky.test").await.is_err());
        assert_eq!(
            caller.call("http://flaky.test").await.unwrap(),
            CallResponse { status: 200 }
        );
        assert!(caller.call("http://other.test").await.is_ok());
        assert_eq!(caller.calls_for("http://flaky.test"), 3);
        assert_eq!(caller.call_count(), 4);
    }
}
