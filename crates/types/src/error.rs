//! Unified error type for the folio workspace.

use thiserror::Error;

/// Enumerates all error kinds that can occur across folio crates.
#[derive(Debug, Error)]
pub enum FolioError {
    /// A required setting is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The token endpoint rejected the credential exchange.
    #[error("upstream auth error: status={status}, body={body}")]
    UpstreamAuth { status: u16, body: String },

    /// A widget upstream (now-playing API, catalog page) returned a non-success status.
    #[error("upstream fetch error: status={status}, url={url}")]
    UpstreamFetch { status: u16, url: String },

    /// An upstream response did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(String),

    /// Key-value store error.
    #[error("storage error: {0}")]
    Storage(String),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ── Feature-gated From impls ──────────────────────────────────────────────────

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for FolioError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for FolioError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for FolioError {
    fn from(e: redis::RedisError) -> Self {
        Self::Storage(e.to_string())
    }
}

impl FolioError {
    /// Returns `true` for errors that indicate a broken deployment rather than
    /// a transient upstream condition.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, FolioError>;
