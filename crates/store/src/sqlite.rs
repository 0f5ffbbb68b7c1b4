//! SQLite-backed key-value store using sqlx.
//!
//! Schema: `kv(key, value, expires_at)` with `key` as primary key and
//! `expires_at` as an optional unix timestamp in seconds.
//!
//! Expired rows are filtered on read and pruned on every write.

use async_trait::async_trait;
use folio_types::{KvStore, traits::Result};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A persistent [`KvStore`] backed by `SQLite`.
pub struct SqliteKvStore {
    /// Connection pool to the `SQLite` database.
    pool: SqlitePool,
}

fn unix_now() -> i64 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs();
    i64::try_from(secs).unwrap_or(i64::MAX)
}

impl SqliteKvStore {
    /// Connects to a `SQLite` database (e.g. `"sqlite:./folio.db"` or `"sqlite::memory:"`).
    ///
    /// Automatically creates the database file if it does not exist and
    /// creates the schema.
    ///
    /// # Errors
    ///
    /// Returns [`folio_types::FolioError::Storage`] if the connection or table creation fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // A single connection keeps `sqlite::memory:` databases coherent.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv (
                key         TEXT    NOT NULL PRIMARY KEY,
                value       TEXT    NOT NULL,
                expires_at  INTEGER
            )",
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT value FROM kv WHERE key = ? AND (expires_at IS NULL OR expires_at > ?)",
        )
        .bind(key)
        .bind(unix_now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let now = unix_now();
        let expires_at = ttl.map(|ttl| {
            now.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
        });

        sqlx::query("DELETE FROM kv WHERE expires_at IS NOT NULL AND expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "INSERT INTO kv (key, value, expires_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 expires_at = excluded.expires_at",
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteKvStore {
        SqliteKvStore::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = memory_store().await;
        store.set("book_id", "42", None).await.unwrap();
        assert_eq!(store.get("book_id").await.unwrap().as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = memory_store().await;
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite() {
        let store = memory_store().await;
        store.set("book_id", "1", None).await.unwrap();
        store
            .set("book_id", "2", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert_eq!(store.get("book_id").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_zero_ttl_is_invisible() {
        let store = memory_store().await;
        store
            .set("tok", "abc", Some(Duration::ZERO))
            .await
            .unwrap();
        assert!(store.get("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = memory_store().await;
        store.set("k", "v", None).await.unwrap();
        store.remove("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("folio.db").display());
        {
            let store = SqliteKvStore::new(&url).await.unwrap();
            store.set("book_id", "16634", None).await.unwrap();
        }
        let store = SqliteKvStore::new(&url).await.unwrap();
        assert_eq!(store.get("book_id").await.unwrap().as_deref(), Some("16634"));
    }
}
