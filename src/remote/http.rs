//! Plain HTTP page fetcher

use crate::remote::{FetchConfig, PageFetcher, RemoteError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Fetches group pages over HTTP(S)
///
/// Any response whose body can be read counts as a success, whatever
/// its status code.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, RemoteError> {
        let response = self.client.get(url).send().await?;
        debug!("GET {} -> {}", url, response.status());
        Ok(response.text().await?)
    }
}
