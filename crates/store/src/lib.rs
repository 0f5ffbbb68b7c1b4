//! Key-value store backends for the portfolio's shared cache.
//!
//! Provides an in-memory store for tests and single-process use, a
//! SQLite-backed store for durable local deployments, and a Redis-backed
//! store for deployments sharing the cache across processes.

pub mod memory;
pub mod redis;
pub mod sqlite;

pub use self::memory::InMemoryKvStore;
pub use self::redis::RedisKvStore;
pub use self::sqlite::SqliteKvStore;

use folio_config::{StoreBackend, StoreConfig};
use folio_types::{FolioError, KvStore, traits::Result};
use std::sync::Arc;

/// Open the backend selected in `config`.
///
/// # Errors
///
/// Returns [`FolioError::Config`] if a networked or file backend has no URL,
/// or [`FolioError::Storage`] if the connection cannot be established.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn KvStore>> {
    let require_url = || {
        config
            .url
            .as_deref()
            .ok_or_else(|| FolioError::Config(format!("store.url is required for {:?}", config.backend)))
    };
    let store: Arc<dyn KvStore> = match config.backend {
        StoreBackend::Memory => Arc::new(InMemoryKvStore::new()),
        StoreBackend::Sqlite => Arc::new(SqliteKvStore::new(require_url()?).await?),
        StoreBackend::Redis => Arc::new(RedisKvStore::new(require_url()?).await?),
    };
    if !config.backend.is_durable() {
        tracing::warn!("memory store selected; cached tokens and the reading pointer are lost on restart");
    }
    tracing::info!(backend = ?config.backend, "key-value store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_memory() {
        let store = open_store(&StoreConfig::default()).await.unwrap();
        store.set("k", "v", None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_open_sqlite_requires_url() {
        let config = StoreConfig {
            backend: StoreBackend::Sqlite,
            url: None,
        };
        let err = open_store(&config).await.err().unwrap();
        assert!(matches!(err, FolioError::Config(_)));
    }

    #[tokio::test]
    async fn test_open_sqlite_in_memory() {
        let config = StoreConfig {
            backend: StoreBackend::Sqlite,
            url: Some("sqlite::memory:".into()),
        };
        let store = open_store(&config).await.unwrap();
        assert!(store.get("missing").await.unwrap().is_none());
    }
}
