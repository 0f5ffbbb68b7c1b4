//! Now-reading pipeline: reading pointer, catalog page, extraction.

use async_trait::async_trait;
use folio_config::CatalogConfig;
use folio_types::{Fetched, FolioError, KvStore, NowReading, WidgetSource, traits::Result};
use std::sync::Arc;

use crate::{CatalogExtractor, UpstreamHttp};

/// Store key holding the current book id as a decimal string.
pub const BOOK_ID_KEY: &str = "book_id";

/// Point the now-reading widget at catalog book `id`. The entry never expires.
///
/// # Errors
///
/// Returns [`FolioError::Storage`] if the store write fails.
pub async fn set_current_book(store: &dyn KvStore, id: i64) -> Result<()> {
    store.set(BOOK_ID_KEY, &id.to_string(), None).await?;
    tracing::info!(book_id = id, "reading pointer updated");
    Ok(())
}

/// Fetches and scrapes the catalog page of the current book.
pub struct NowReadingFetcher {
    store: Arc<dyn KvStore>,
    http: UpstreamHttp,
    catalog: CatalogConfig,
    extractor: CatalogExtractor,
}

impl NowReadingFetcher {
    /// # Errors
    ///
    /// Returns [`FolioError::Config`] if a configured selector is invalid.
    pub fn new(store: Arc<dyn KvStore>, http: UpstreamHttp, catalog: CatalogConfig) -> Result<Self> {
        let extractor = CatalogExtractor::new(&catalog.selectors)?;
        Ok(Self {
            store,
            http,
            catalog,
            extractor,
        })
    }

    async fn book_id(&self) -> Result<Option<i64>> {
        let Some(raw) = self.store.get(BOOK_ID_KEY).await? else {
            return Ok(None);
        };
        raw.trim()
            .parse()
            .map(Some)
            .map_err(|_| FolioError::Parse(format!("stored book id `{raw}` is not an integer")))
    }

    /// Run the pipeline, returning `None` when no book is set.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Parse`] for a non-integer pointer,
    /// [`FolioError::UpstreamFetch`] for a non-2xx catalog response, or
    /// transport and storage errors.
    pub async fn fetch(&self) -> Result<Option<NowReading>> {
        let Some(id) = self.book_id().await? else {
            return Ok(None);
        };
        let url = self.catalog.book_url(id);
        let html = self
            .http
            .send(self.http.client().get(&url))
            .await?
            .text()
            .await?;
        let fields = self.extractor.extract(&html);
        if fields.title.is_none() {
            tracing::debug!(url = %url, "catalog page had no title match");
        }
        Ok(Some(NowReading {
            title: fields.title,
            author_name: fields.author,
            cover_url: fields.cover,
            source_url: url,
        }))
    }
}

#[async_trait]
impl WidgetSource for NowReadingFetcher {
    type Output = NowReading;

    async fn current(&self) -> Fetched<NowReading> {
        let result = self.fetch().await;
        match &result {
            Ok(Some(book)) => tracing::debug!(source = %book.source_url, "now reading"),
            Ok(None) => tracing::debug!("no book set"),
            Err(e) => tracing::warn!(error = %e, "now-reading widget unavailable"),
        }
        Fetched::from_result(result, "no book set")
    }
}
