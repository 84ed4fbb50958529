//! SQLite-based group store

use crate::core::{Group, NewGroup, NewPosting, Posting};
use crate::persistence::{GroupStore, StoreError};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS groups (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        fb_id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        fb_url TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS postings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        group_id INTEGER NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
        fb_id TEXT NOT NULL,
        created_time TEXT,
        updated_time TEXT,
        message TEXT,
        name TEXT,
        attachment_title TEXT,
        attachment_description TEXT,
        attachment_url TEXT,
        attachment_media_url TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_postings_group_id ON postings(group_id)",
];

/// SQLite group store
///
/// The `UNIQUE` constraint on `groups.fb_id` is what guarantees one
/// group per external identifier across concurrent loads.
pub struct SqliteGroupStore {
    pool: SqlitePool,
}

impl SqliteGroupStore {
    /// Create a new SQLite store (`":memory:"` for an ephemeral database)
    pub async fn new(db_path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path))
            .context("Invalid database path")?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to :memory: is its own database, so keep exactly one alive.
        let pool_options = if db_path == ":memory:" {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.init().await?;

        Ok(store)
    }

    /// Create a store at `path`, creating its parent directory
    pub async fn at_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let db_path = path
            .to_str()
            .context("Database path is not valid UTF-8")?;
        Self::new(db_path).await
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to initialize schema")?;
        }
        Ok(())
    }

    fn to_naive(dt: DateTime<Utc>) -> NaiveDateTime {
        dt.naive_utc()
    }

    fn from_naive(dt: NaiveDateTime) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(dt, Utc)
    }

    fn group_from_row(row: &SqliteRow) -> Group {
        Group {
            id: row.get("id"),
            fb_id: row.get("fb_id"),
            name: row.get("name"),
            fb_url: row.get("fb_url"),
        }
    }

    fn posting_from_row(row: &SqliteRow) -> Posting {
        Posting {
            id: row.get("id"),
            group_id: row.get("group_id"),
            fb_id: row.get("fb_id"),
            created_time: row
                .get::<Option<NaiveDateTime>, _>("created_time")
                .map(Self::from_naive),
            updated_time: row
                .get::<Option<NaiveDateTime>, _>("updated_time")
                .map(Self::from_naive),
            message: row.get("message"),
            name: row.get("name"),
            attachment_title: row.get("attachment_title"),
            attachment_description: row.get("attachment_description"),
            attachment_url: row.get("attachment_url"),
            attachment_media_url: row.get("attachment_media_url"),
        }
    }
}

#[async_trait::async_trait]
impl GroupStore for SqliteGroupStore {
    async fn find_group_by_fb_id(&self, fb_id: &str) -> Result<Option<Group>, StoreError> {
        let row = sqlx::query("SELECT id, fb_id, name, fb_url FROM groups WHERE fb_id = ?1")
            .bind(fb_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(Self::group_from_row))
    }

    async fn create_group(&self, group: &NewGroup) -> Result<Group, StoreError> {
        let result = sqlx::query("INSERT INTO groups (fb_id, name, fb_url) VALUES (?1, ?2, ?3)")
            .bind(&group.fb_id)
            .bind(&group.name)
            .bind(&group.fb_url)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => {
                debug!("Inserted group {} as row {}", group.fb_id, done.last_insert_rowid());
                Ok(Group {
                    id: done.last_insert_rowid(),
                    fb_id: group.fb_id.clone(),
                    name: group.name.clone(),
                    fb_url: group.fb_url.clone(),
                })
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::Conflict(group.fb_id.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn add_posting(
        &self,
        group: &Group,
        posting: &NewPosting,
    ) -> Result<Posting, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO postings
            (group_id, fb_id, created_time, updated_time, message, name,
             attachment_title, attachment_description, attachment_url, attachment_media_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(group.id)
        .bind(&posting.fb_id)
        .bind(posting.created_time.map(Self::to_naive))
        .bind(posting.updated_time.map(Self::to_naive))
        .bind(&posting.message)
        .bind(&posting.name)
        .bind(&posting.attachment_title)
        .bind(&posting.attachment_description)
        .bind(&posting.attachment_url)
        .bind(&posting.attachment_media_url)
        .execute(&self.pool)
        .await;

        let done = match result {
            Ok(done) => done,
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Err(StoreError::UnknownGroup(group.id));
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Posting {
            id: done.last_insert_rowid(),
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
        })
    }

    async fn list_groups(&self) -> Result<Vec<Group>, StoreError> {
        let rows = sqlx::query("SELECT id, fb_id, name, fb_url FROM groups ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(Self::group_from_row).collect())
    }

    async fn list_postings(&self, group_id: i64) -> Result<Vec<Posting>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, group_id, fb_id, created_time, updated_time, message, name,
                   attachment_title, attachment_description, attachment_url, attachment_media_url
            FROM postings
            WHERE group_id = ?1
            ORDER BY id ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::posting_from_row).collect())
    }
}
