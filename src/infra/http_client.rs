use crate::app::ports::{FetchResult, SourcePort};
use crate::error::{Result, SeederError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

pub struct ReqwestSource {
    client: reqwest::Client,
}

impl Default for ReqwestSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SourcePort for ReqwestSource {
    #[instrument(skip(self))]
    async fn fetch(&self, location: &str) -> Result<FetchResult> {
        let resp = self
            .client
            .get(location)
            .send()
            .await
            .map_err(|e| SeederError::SourceUnavailable(format!("GET {location} failed: {e}")))?;
        let status = resp.status().as_u16();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| SeederError::SourceUnavailable(format!("reading body of {location} failed: {e}")))?
            .to_vec();
        debug!("GET {} -> {} ({} bytes)", location, status, bytes.len());
        Ok(FetchResult { status, bytes })
    }
}
