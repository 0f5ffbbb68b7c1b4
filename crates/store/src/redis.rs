//! Redis-backed key-value store.
//!
//! TTLs map to `SET … EX`, so expiry is enforced by the server and visible to
//! every process sharing the instance.
//!
//! The `ConnectionManager` is cheap to clone and reconnects on its own; each
//! operation works on its own clone instead of sharing a lock.

use ::redis::{AsyncCommands as _, Client, aio::ConnectionManager};
use async_trait::async_trait;
use folio_types::{FolioError, KvStore, traits::Result};
use std::time::Duration;

/// Whole seconds for `SET … EX`. The server rejects `EX 0`, so sub-second
/// TTLs round up to one second.
fn expire_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// A shared [`KvStore`] backed by Redis (or any RESP-compatible service).
#[derive(Clone)]
pub struct RedisKvStore {
    connection: ConnectionManager,
}

impl RedisKvStore {
    /// Connects to `redis_url` (e.g. `redis://localhost:6379`).
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Storage`] if the client cannot be opened or the
    /// initial connection fails.
    pub async fn new(redis_url: &str) -> Result<Self> {
        // The URL may carry a password, so it is never logged.
        let client = Client::open(redis_url).map_err(|e| {
            tracing::error!(error = %e, "failed to open redis client");
            FolioError::Storage(format!("failed to open redis client: {e}"))
        })?;
        let connection = ConnectionManager::new(client).await.map_err(|e| {
            tracing::error!(error = %e, "failed to connect to redis");
            FolioError::Storage(format!("failed to connect to redis: {e}"))
        })?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.connection.clone();
        match ttl {
            Some(ttl) => {
                let () = conn.set_ex(key, value, expire_secs(ttl)).await?;
            }
            None => {
                let () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.connection.clone();
        let () = conn.del(key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expire_secs() {
        assert_eq!(expire_secs(Duration::ZERO), 1);
        assert_eq!(expire_secs(Duration::from_millis(500)), 1);
        assert_eq!(expire_secs(Duration::from_millis(1500)), 1);
        assert_eq!(expire_secs(Duration::from_secs(3600)), 3600);
    }

    /// Needs a live server: `REDIS_URL=redis://localhost:6379 cargo test -- --ignored`.
    #[tokio::test]
    #[ignore = "requires REDIS_URL"]
    async fn test_round_trip_against_server() {
        let Ok(url) = std::env::var("REDIS_URL") else {
            return;
        };
        let store = RedisKvStore::new(&url).await.unwrap();
        store
            .set("folio:test", "v", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert_eq!(store.get("folio:test").await.unwrap().as_deref(), Some("v"));
        store.remove("folio:test").await.unwrap();
        assert!(store.get("folio:test").await.unwrap().is_none());
    }
}
