//! Configuration loading and hot-reloading for the folio server.
//!
//! Uses figment for YAML-based configuration with sensible defaults and
//! environment overrides, and notify + arc-swap for live file watching.

pub mod schema;
pub mod watcher;

pub use schema::{
    CatalogConfig, Config, HttpConfig, LinkConfig, LogConfig, MusicConfig, ProfileConfig,
    SelectorConfig, StoreBackend, StoreConfig,
};
pub use watcher::ConfigWatcher;
