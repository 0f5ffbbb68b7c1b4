//! Widget pipelines for the portfolio page.
//!
//! Each pipeline implements [`WidgetSource`](folio_types::WidgetSource): a sequential chain of remote
//! calls that ends in either a display-ready payload or
//! [`Fetched::Unavailable`](folio_types::Fetched). Errors never escape a
//! pipeline; they are logged at the boundary.

pub mod extract;
pub mod http_util;
pub mod now_playing;
pub mod now_reading;

pub use extract::{BookFields, CatalogExtractor};
pub use http_util::{UpstreamHttp, build_http_client};
pub use now_playing::NowPlayingFetcher;
pub use now_reading::{BOOK_ID_KEY, NowReadingFetcher, set_current_book};
