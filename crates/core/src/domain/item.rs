// Queue Item Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// A pending URL in the queue.
///
/// The URL is opaque: no identity beyond its value, duplicates are
/// independent items. Only submission checks it is non-empty; items read
/// back from the store are taken as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueItem(String);

impl QueueItem {
    /// Validate a submitted URL (surrounding whitespace is trimmed)
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref().trim();
        if url.is_empty() {
            return Err(DomainError::EmptyUrl);
        }
        Ok(Self(url.to_string()))
    }

    /// Wrap a value popped from the queue store without validation
    pub fn from_stored(url: String) -> Self {
        Self(url)
    }

    pub fn url(&self) -> &str {
        &self.0
    }

    pub fn into_url(self) -> String {
        self.0
    }
}

impl std::fmt::Display for QueueItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
