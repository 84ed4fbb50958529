//! Outbound collaborators: group page fetching and the remote group API

pub mod client;
pub mod graph;
pub mod http;
pub mod response;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use client::{FetchConfig, GraphApiConfig};
pub use graph::GraphApiClient;
pub use http::HttpPageFetcher;
pub use response::RemoteError;

/// Fetches the raw body of a page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET the URL and return its body as text
    async fn fetch(&self, url: &str) -> Result<String, RemoteError>;
}

/// Resolves remote group records by external identifier
#[async_trait]
pub trait GroupApi: Send + Sync {
    /// Look up a group together with its feed
    async fn find_group(&self, fb_id: &str) -> Result<RemoteGroup, RemoteError>;
}

/// Group record as returned by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteGroup {
    pub id: String,
    pub name: String,
    pub feed: Vec<RemotePosting>,
}

/// One entry of a remote group's feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePosting {
    pub id: String,
    pub created_time: Option<DateTime<Utc>>,
    pub updated_time: Option<DateTime<Utc>>,
    pub message: Option<String>,
    pub name: Option<String>,
    pub attachment: Option<RemoteAttachment>,
}

/// Attachment of a posting; every field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAttachment {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub media_url: Option<String>,
}
