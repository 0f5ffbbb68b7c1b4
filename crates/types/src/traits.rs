//! Async traits shared across all folio crates.
//!
//! Every cross-crate abstraction is defined here so that higher layers depend
//! only on `folio-types`, not on each other.

use crate::{CachedToken, Fetched};
use async_trait::async_trait;
use std::time::Duration;

pub use crate::error::Result;

/// Shared, durable string key-value store with optional per-entry TTL.
///
/// Writes are eventually visible to later reads from this or any other
/// process sharing the backend. No ordering or transactional guarantees.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Load the value stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;
    /// Store `value` under `key`, replacing any previous value.
    ///
    /// With `ttl` set, the entry disappears once that much time has passed.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;
    /// Delete the entry under `key`, if any.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Acquires and refreshes access tokens for an upstream API.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain a valid access token, exchanging the refresh credential if necessary.
    async fn get_token(&self) -> Result<CachedToken>;
    /// Force a credential exchange, bypassing the cache.
    async fn refresh(&self) -> Result<CachedToken>;
}

/// A page widget backed by a remote data pipeline.
///
/// Implementations never fail: any error in the pipeline is logged and
/// surfaced as [`Fetched::Unavailable`].
#[async_trait]
pub trait WidgetSource: Send + Sync {
    /// Display-ready payload of this widget.
    type Output: Send;

    /// Run the pipeline once.
    async fn current(&self) -> Fetched<Self::Output>;
}
