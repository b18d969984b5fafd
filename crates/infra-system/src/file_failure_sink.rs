// File-backed failure sink
use async_trait::async_trait;
use relayq_core::domain::FailureRecord;
use relayq_core::error::Result;
use relayq_core::port::FailureSink;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub const DEFAULT_FAILURE_LOG: &str = "failed_urls.log";

/// Appends one line per record to a log file
///
/// The file is opened in append mode, written and closed on every record;
/// no handle is kept between writes. Each line goes out in a single write.
#[derive(Debug, Clone)]
pub struct FileFailureSink {
    path: PathBuf,
}

impl FileFailureSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FailureSink for FileFailureSink {
    async fn append(&self, record: &FailureRecord) -> Result<()> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        options.mode(0o644);

        let mut file = options.open(&self.path).await?;

        let mut line = record.to_log_line();
        line.push('\n');
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %self.path.display(), url = %record.url, "Appended failure record");
        Ok(())
    }
}
