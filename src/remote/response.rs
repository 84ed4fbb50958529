//! Remote error type and the wire format of the group API

use crate::remote::{RemoteAttachment, RemoteGroup, RemotePosting};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Error types for outbound calls
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No access token configured for the group API")]
    MissingCredentials,
}

/// Group object as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct GraphGroup {
    pub id: String,
    pub name: String,
}

/// One page of a group feed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphFeed {
    #[serde(default)]
    pub data: Vec<GraphPosting>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphPosting {
    pub id: String,

    #[serde(default, deserialize_with = "deserialize_graph_time")]
    pub created_time: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_graph_time")]
    pub updated_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub attachments: Option<GraphAttachments>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphAttachments {
    #[serde(default)]
    pub data: Vec<GraphAttachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphAttachment {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub media: Option<GraphMedia>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphMedia {
    #[serde(default)]
    pub image: Option<GraphImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphImage {
    #[serde(default)]
    pub src: Option<String>,
}

/// Parse API timestamps, which use a `+0000` style offset
pub fn parse_graph_time(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z").map(|dt| dt.with_timezone(&Utc))
}

fn deserialize_graph_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_graph_time(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

impl From<GraphPosting> for RemotePosting {
    fn from(posting: GraphPosting) -> Self {
        let attachment = posting
            .attachments
            .and_then(|a| a.data.into_iter().next())
            .map(|a| RemoteAttachment {
                title: a.title,
                description: a.description,
                url: a.url,
                media_url: a.media.and_then(|m| m.image).and_then(|i| i.src),
            });

        RemotePosting {
            id: posting.id,
            created_time: posting.created_time,
            updated_time: posting.updated_time,
            message: posting.message,
            name: posting.name,
            attachment,
        }
    }
}

impl GraphGroup {
    /// Combine the group object with its feed
    pub fn with_feed(self, feed: GraphFeed) -> RemoteGroup {
        RemoteGroup {
            id: self.id,
            name: self.name,
            feed: feed.data.into_iter().map(RemotePosting::from).collect(),
        }
    }
}
