//! Persisted group and posting entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::remote::RemotePosting;

/// A stored group, unique by `fb_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Local row id
    pub id: i64,

    /// External group identifier
    pub fb_id: String,

    pub name: String,

    /// Page URL the group was loaded from
    pub fb_url: String,
}

/// Fields needed to create a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub fb_id: String,
    pub name: String,
    pub fb_url: String,
}

/// A stored posting owned by one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub id: i64,
    pub group_id: i64,
    pub fb_id: String,
    pub created_time: Option<DateTime<Utc>>,
    pub updated_time: Option<DateTime<Utc>>,
    pub message: Option<String>,
    pub name: Option<String>,
    pub attachment_title: Option<String>,
    pub attachment_description: Option<String>,
    pub attachment_url: Option<String>,
    pub attachment_media_url: Option<String>,
}

/// Fields copied from a remote posting when storing it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewPosting {
    pub fb_id: String,
    pub created_time: Option<DateTime<Utc>>,
    pub updated_time: Option<DateTime<Utc>>,
    pub message: Option<String>,
    pub name: Option<String>,
    pub attachment_title: Option<String>,
    pub attachment_description: Option<String>,
    pub attachment_url: Option<String>,
    pub attachment_media_url: Option<String>,
}

impl From<&RemotePosting> for NewPosting {
    fn from(posting: &RemotePosting) -> Self {
        let attachment = posting.attachment.as_ref();
        Self {
            fb_id: posting.id.clone(),
            created_time: posting.created_time,
            updated_time: posting.updated_time,
            message: posting.message.clone(),
            name: posting.name.clone(),
            attachment_title: attachment.and_then(|a| a.title.clone()),
            attachment_description: attachment.and_then(|a| a.description.clone()),
            attachment_url: attachment.and_then(|a| a.url.clone()),
            attachment_media_url: attachment.and_then(|a| a.media_url.clone()),
        }
    }
}
