//! Widget payloads and the result type returned at pipeline boundaries.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Outcome of a widget pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Fetched<T> {
    Ready(T),
    /// The widget has nothing to show. The reason is for logs, not for display.
    Unavailable(String),
}

impl<T> Fetched<T> {
    /// Collapse a pipeline result: `Ok(None)` means "nothing to show" and is
    /// reported with `empty_reason`.
    pub fn from_result(result: Result<Option<T>>, empty_reason: &str) -> Self {
        match result {
            Ok(Some(value)) => Self::Ready(value),
            Ok(None) => Self::Unavailable(empty_reason.to_string()),
            Err(e) => Self::Unavailable(e.to_string()),
        }
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }
}

/// The track currently playing on the music service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub track_name: String,
    /// Artist names in the order the upstream lists them.
    pub artist_names: Vec<String>,
    pub album_art_url: Option<String>,
    /// Public web link to the track.
    pub external_url: Option<String>,
    pub is_playing: bool,
}

impl NowPlaying {
    /// Artist names joined with `", "`.
    #[must_use]
    pub fn artists_line(&self) -> String {
        self.artist_names.join(", ")
    }
}

/// The book currently being read, as scraped from the catalog.
///
/// Every scraped field is optional: missing markup yields an absent field
/// instead of failing the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowReading {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub cover_url: Option<String>,
    /// Catalog page the fields were scraped from.
    pub source_url: String,
}
