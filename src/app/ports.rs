use async_trait::async_trait;

use crate::error::Result;

/// Anything that can hand back the raw bytes of a CSV export
#[async_trait]
pub trait SourcePort: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<FetchResult>;
}

#[derive(Clone, Debug)]
pub struct FetchResult {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl FetchResult {
    pub fn ok(bytes: Vec<u8>) -> Self {
        Self { status: 200, bytes }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
