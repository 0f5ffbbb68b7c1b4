//! HTTP layer: axum router, route handlers, and error mapping.
//!
//! Serves the portfolio page at `/` and the administrative `/book/{id}`
//! endpoint that moves the reading pointer.

mod book;
mod error;
pub mod page;

pub use error::ApiError;

use arc_swap::ArcSwap;
use axum::{Router, routing::get};
use folio_config::Config;
use folio_types::{KvStore, NowPlaying, NowReading, WidgetSource};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state passed to all route handlers.
pub struct AppState {
    /// Live configuration snapshot. Atomically swappable for hot-reloading.
    pub config: Arc<ArcSwap<Config>>,
    /// Shared key-value store holding the reading pointer.
    pub store: Arc<dyn KvStore>,
    pub now_playing: Arc<dyn WidgetSource<Output = NowPlaying>>,
    pub now_reading: Arc<dyn WidgetSource<Output = NowReading>>,
}

impl AppState {
    /// Creates a new shared application state wrapped in an `Arc`.
    pub fn new(
        config: Arc<ArcSwap<Config>>,
        store: Arc<dyn KvStore>,
        now_playing: Arc<dyn WidgetSource<Output = NowPlaying>>,
        now_reading: Arc<dyn WidgetSource<Output = NowReading>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            now_playing,
            now_reading,
        })
    }
}

/// Build the full axum router.
///
/// Routes:
/// - GET /            portfolio page
/// - GET /book/{id}   set the current book
pub fn make_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/book/{id}", get(book::set_book))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
