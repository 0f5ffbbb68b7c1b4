//! Book-catalog page extraction.
//!
//! The catalog is a third-party site with no stable markup contract. All
//! coupling to its class names lives here, behind raw HTML in and optional
//! fields out; selectors come from configuration.

use folio_config::SelectorConfig;
use folio_types::{FolioError, traits::Result};
use scraper::{Html, Selector};

/// Fields scraped from one catalog page. Missing markup leaves a field `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover: Option<String>,
}

/// Compiled selectors for a catalog page.
pub struct CatalogExtractor {
    title: Selector,
    author: Selector,
    cover: Selector,
}

fn compile(name: &str, css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| {
        FolioError::Config(format!("invalid catalog.selectors.{name} `{css}`: {e}"))
    })
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl CatalogExtractor {
    /// Compile the configured selectors.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Config`] if any selector is not valid CSS.
    pub fn new(selectors: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            title: compile("title", &selectors.title)?,
            author: compile("author", &selectors.author)?,
            cover: compile("cover", &selectors.cover)?,
        })
    }

    /// Extract title, first contributor and cover image from a catalog page.
    ///
    /// Text fields are whitespace-trimmed; empty values count as missing.
    #[must_use]
    pub fn extract(&self, html: &str) -> BookFields {
        let doc = Html::parse_document(html);
        let text_of = |selector: &Selector| {
            doc.select(selector)
                .next()
                .and_then(|el| non_empty(&el.text().collect::<String>()))
        };

        BookFields {
            title: text_of(&self.title),
            author: text_of(&self.author),
            cover: doc
                .select(&self.cover)
                .next()
                .and_then(|el| el.value().attr("src"))
                .and_then(non_empty),
        }
    }
}
