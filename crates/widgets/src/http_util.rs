//! Shared HTTP utilities for widget pipelines.
//!
//! Eliminates duplicated send → status-check logic across fetchers.

use folio_config::HttpConfig;
use folio_types::{FolioError, traits::Result};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

/// Build the outbound HTTP client from configuration.
///
/// An invalid `proxy_url` is logged and ignored; a `timeout_secs` of zero
/// disables the timeout.
#[must_use]
pub fn build_http_client(config: &HttpConfig) -> Client {
    let mut builder = Client::builder().user_agent(config.user_agent.as_str());
    if config.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.timeout_secs));
    }
    if let Some(url) = config.proxy_url.as_deref() {
        match reqwest::Proxy::all(url) {
            Ok(proxy) => builder = builder.proxy(proxy),
            Err(e) => {
                tracing::warn!(url = url, error = %e, "invalid proxy_url, using direct connection");
            }
        }
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to build configured http client, using defaults");
        Client::new()
    })
}

/// Shared HTTP helper that all fetchers use to send requests and reject
/// non-success responses uniformly.
#[derive(Clone)]
pub struct UpstreamHttp {
    http: Client,
}

impl UpstreamHttp {
    /// Creates a new helper wrapping the given HTTP client.
    #[must_use]
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Returns a reference to the inner HTTP client for building requests.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.http
    }

    /// Sends a request and checks for success status.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::UpstreamFetch`] on non-2xx status codes, or
    /// [`FolioError::Http`] if the request fails to send.
    pub async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(FolioError::UpstreamFetch {
                status: status.as_u16(),
                url: resp.url().to_string(),
            })
        }
    }
}
