//! Graph API client for group records and feeds

use crate::remote::response::{GraphFeed, GraphGroup};
use crate::remote::{GraphApiConfig, GroupApi, RemoteError, RemoteGroup};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

const FEED_FIELDS: &str =
    "id,created_time,updated_time,message,name,attachments{title,description,url,media}";

/// `GroupApi` backed by the Graph API over HTTP
#[derive(Debug, Clone)]
pub struct GraphApiClient {
    client: Client,
    config: GraphApiConfig,
}

impl GraphApiClient {
    pub fn new(config: GraphApiConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        let url = format!("{}/{}", self.config.api_root(), path);
        debug!("GET {}", url);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl GroupApi for GraphApiClient {
    async fn find_group(&self, fb_id: &str) -> Result<RemoteGroup, RemoteError> {
        let token = self
            .config
            .access_token()
            .ok_or(RemoteError::MissingCredentials)?;

        let group: GraphGroup = self
            .get_json(
                fb_id,
                &[
                    ("fields", "id,name".to_string()),
                    ("access_token", token.clone()),
                ],
            )
            .await?;

        let feed: GraphFeed = self
            .get_json(
                &format!("{}/feed", fb_id),
                &[
                    ("fields", FEED_FIELDS.to_string()),
                    ("limit", self.config.feed_limit.to_string()),
                    ("access_token", token),
                ],
            )
            .await?;

        info!(
            "Fetched remote group {} with {} postings",
            group.id,
            feed.data.len()
        );
        Ok(group.with_feed(feed))
    }
}
