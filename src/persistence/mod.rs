//! Persistence layer for groups and their postings

#[cfg(feature = "sqlite")]
pub mod store;

#[cfg(feature = "sqlite")]
pub use store::SqliteGroupStore;

use crate::core::{Group, NewGroup, NewPosting, Posting};
use std::collections::HashMap;
use thiserror::Error;

/// Error types for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A group with this external identifier already exists
    #[error("Group with external id {0} already exists")]
    Conflict(String),

    #[error("Group {0} does not exist")]
    UnknownGroup(i64),

    #[error("Database error: {0}")]
    Database(String),
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Trait for group storage backends
#[async_trait::async_trait]
pub trait GroupStore: Send + Sync {
    /// Find a group by its external identifier
    async fn find_group_by_fb_id(&self, fb_id: &str) -> Result<Option<Group>, StoreError>;

    /// Create a group; fails with `Conflict` if the external id is taken
    async fn create_group(&self, group: &NewGroup) -> Result<Group, StoreError>;

    /// Add a posting owned by `group`
    async fn add_posting(&self, group: &Group, posting: &NewPosting)
        -> Result<Posting, StoreError>;

    /// List all groups
    async fn list_groups(&self) -> Result<Vec<Group>, StoreError>;

    /// List the postings of a group in insertion order
    async fn list_postings(&self, group_id: i64) -> Result<Vec<Posting>, StoreError>;
}

#[derive(Default)]
struct MemoryTables {
    groups: Vec<Group>,
    postings: Vec<Posting>,
    next_posting_id: i64,
}

/// In-memory store (for testing or ephemeral use)
///
/// The uniqueness check and insert in `create_group` happen under one
/// write lock.
pub struct InMemoryGroupStore {
    tables: tokio::sync::RwLock<MemoryTables>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self {
            tables: tokio::sync::RwLock::new(MemoryTables::default()),
        }
    }

    /// Number of postings per group id
    pub async fn posting_counts(&self) -> HashMap<i64, usize> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for posting in &tables.postings {
            *counts.entry(posting.group_id).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for InMemoryGroupStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl GroupStore for InMemoryGroupStore {
    async fn find_group_by_fb_id(&self, fb_id: &str) -> Result<Option<Group>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.groups.iter().find(|g| g.fb_id == fb_id).cloned())
    }

    async fn create_group(&self, group: &NewGroup) -> Result<Group, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.groups.iter().any(|g| g.fb_id == group.fb_id) {
            return Err(StoreError::Conflict(group.fb_id.clone()));
        }

        let created = Group {
            id: tables.groups.len() as i64 + 1,
            fb_id: group.fb_id.clone(),
            name: group.name.clone(),
            fb_url: group.fb_url.clone(),
        };
        tables.groups.push(created.clone());
        Ok(created)
    }

    async fn add_posting(
        &self,
        group: &Group,
        posting: &NewPosting,
    ) -> Result<Posting, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.groups.iter().any(|g| g.id == group.id) {
            return Err(StoreError::UnknownGroup(group.id));
        }

        tables.next_posting_id += 1;
        let created = Posting {
            id: tables.next_posting_id,
            group_id: group.id,
            fb_id: posting.fb_id.clone(),
            created_time: posting.created_time,
            updated_time: posting.updated_time,
            message: posting.message.clone(),
            name: posting.name.clone(),
            attachment_title: posting.attachment_title.clone(),
            attachment_description: posting.attachment_description.clone(),
            attachment_url: posting.attachment_url.clone(),
            attachment_media_url: posting.attachment_media_url.clone(),
        };
        tables.postings.push(created.clone());
        Ok(created)
    }

    async fn list_groups(&self) -> Result<Vec<Group>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.groups.clone())
    }

    async fn list_postings(&self, group_id: i64) -> Result<Vec<Posting>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .postings
            .iter()
            .filter(|p| p.group_id == group_id)
            .cloned()
            .collect())
    }
}
