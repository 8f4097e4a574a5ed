//! Timeout-bounded HTTP fetcher

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::types::{PricewatchError, Result, SourceError};

/// Default per-request deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Issues single GET requests under a hard deadline.
///
/// The deadline covers the whole exchange, including reading the body. When it
/// elapses the request future is dropped, which cancels the connection.
/// No retries are attempted here.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("pricewatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PricewatchError::HttpClient(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    /// Fetch `url` and return the raw response body
    pub async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, SourceError> {
        debug!(url, timeout_ms = self.timeout.as_millis() as u64, "Fetching");

        match tokio::time::timeout(self.timeout, self.get(url)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                after_ms: self.timeout.as_millis() as u64,
            }),
        }
    }

    async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Network(format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read body: {e}")))?;
        Ok(body.to_vec())
    }
}
