//! Core types and traits for the folio workspace.
//!
//! This crate defines the shared abstractions used across all layers of the
//! portfolio server: the error taxonomy, the cached access token, the widget
//! payloads, and the async traits that each layer implements.

pub mod error;
pub mod token;
pub mod traits;
pub mod widget;

pub use error::FolioError;
pub use token::CachedToken;
pub use traits::{KvStore, TokenProvider, WidgetSource};
pub use widget::{Fetched, NowPlaying, NowReading};
