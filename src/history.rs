//! Append-only history of picked pictures, stored in SQLite.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid database url: {0}")]
    InvalidUrl(String),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("database error: {0}")]
    Query(#[from] sqlx::Error),
}

/// One previously picked picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct HistoryRecord {
    #[serde(skip_serializing)]
    pub id: String,

    /// Location of the picture itself.
    #[serde(rename = "url")]
    #[sqlx(rename = "url")]
    pub image_url: String,

    /// Permanent link to the post the picture came from.
    pub post_url: String,

    pub created_at: DateTime<Utc>,
}

/// SQLite-backed history store. Cloning shares the underlying pool.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

fn connect_options(url: &str) -> Result<SqliteConnectOptions, StoreError> {
    let url = url.trim();
    let opts = if url.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(url).map_err(|e| StoreError::InvalidUrl(e.to_string()))?
    } else if url.is_empty() {
        return Err(StoreError::InvalidUrl("empty database url".to_string()));
    } else {
        SqliteConnectOptions::new().filename(url)
    };
    Ok(opts.create_if_missing(true))
}

impl HistoryStore {
    /// Open (creating if needed) the database at `url` and run migrations.
    ///
    /// Accepts `sqlite://path`, `sqlite::memory:` or a bare file path.
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let opts = connect_options(url)?;

        // Every connection to `:memory:` is a separate database, so keep one
        // connection alive for the lifetime of the pool.
        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(opts)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(opts).await?
        };

        let store = Self { pool };
        store.run_migrations().await?;
        tracing::debug!("history store ready");
        Ok(store)
    }

    /// Create the history table if it does not exist yet.
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS history (
                id TEXT PRIMARY KEY,
                url TEXT NOT NULL,
                post_url TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Record a new pick. The row is committed before this returns.
    pub async fn append(&self, image_url: &str, post_url: &str) -> Result<HistoryRecord, StoreError> {
        let record = HistoryRecord {
            id: Uuid::new_v4().to_string(),
            image_url: image_url.to_string(),
            post_url: post_url.to_string(),
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;
        sqlx::query("INSERT INTO history (id, url, post_url, created_at) VALUES (?, ?, ?, ?)")
            .bind(&record.id)
            .bind(&record.image_url)
            .bind(&record.post_url)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::debug!(id = %record.id, url = %record.image_url, "history record appended");
        Ok(record)
    }

    /// Every record, oldest insert first.
    pub async fn list_all(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        let rows = sqlx::query_as::<_, HistoryRecord>(
            "SELECT id, url, post_url, created_at FROM history ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Close the pool, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_options_accepts_known_forms() {
        assert!(connect_options("sqlite://history.db").is_ok());
        assert!(connect_options("sqlite::memory:").is_ok());
        assert!(connect_options("/tmp/history.db").is_ok());
    }

    #[test]
    fn connect_options_rejects_empty() {
        assert!(matches!(connect_options("  "), Err(StoreError::InvalidUrl(_))));
    }

    #[test]
    fn record_serializes_public_fields_only() {
        let record = HistoryRecord {
            id: "secret-id".to_string(),
            image_url: "https://i.redd.it/a.jpg".to_string(),
            post_url: "https://www.reddit.com/r/pics/comments/a/".to_string(),
            created_at: DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["url"], "https://i.redd.it/a.jpg");
        assert_eq!(json["post_url"], "https://www.reddit.com/r/pics/comments/a/");
        assert_eq!(json["created_at"], "2024-01-02T03:04:05Z");
        assert!(json.get("id").is_none());
        assert!(json.get("image_url").is_none());
    }

    #[tokio::test]
    async fn in_memory_store_round_trips() {
        let store = HistoryStore::open("sqlite::memory:").await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());

        let record = store
            .append("https://i.redd.it/a.jpg", "https://www.reddit.com/r/pics/a/")
            .await
            .unwrap();
        assert_eq!(store.list_all().await.unwrap(), vec![record]);
    }
}
