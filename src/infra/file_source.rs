use crate::app::ports::{FetchResult, SourcePort};
use crate::error::{Result, SeederError};
use async_trait::async_trait;
use tracing::debug;

/// Reads a CSV export that was already downloaded to disk
pub struct FileSource;

#[async_trait]
impl SourcePort for FileSource {
    async fn fetch(&self, location: &str) -> Result<FetchResult> {
        let bytes = tokio::fs::read(location)
            .await
            .map_err(|e| SeederError::SourceUnavailable(format!("Failed to read '{location}': {e}")))?;
        debug!("Read {} bytes from {}", bytes.len(), location);
        Ok(FetchResult::ok(bytes))
    }
}
