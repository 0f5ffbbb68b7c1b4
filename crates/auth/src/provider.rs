//! Cache-or-refresh access token provider.
//!
//! Every call reads the shared store first. On a miss the refresh credential
//! is exchanged at the token endpoint and the new token is written back with
//! a TTL equal to the advertised `expires_in`, so the store evicts it on its
//! own. The cached JSON also carries `expires_at`, which is checked on read
//! for backends that do not evict.
//!
//! Two concurrent misses may both refresh and both write; either token is valid.

use async_trait::async_trait;
use folio_config::MusicConfig;
use folio_types::{CachedToken, FolioError, KvStore, TokenProvider, traits::Result};
use secrecy::ExposeSecret as _;
use std::{sync::Arc, time::Duration};

use crate::{Credentials, spotify};

/// Store key holding the JSON-encoded [`CachedToken`].
pub const ACCESS_TOKEN_KEY: &str = "spotify_access_token";

/// [`TokenProvider`] backed by a refresh credential and a [`KvStore`].
pub struct RefreshTokenProvider {
    store: Arc<dyn KvStore>,
    http: reqwest::Client,
    token_url: String,
    credentials: Credentials,
}

impl RefreshTokenProvider {
    pub fn new(store: Arc<dyn KvStore>, http: reqwest::Client, music: &MusicConfig) -> Self {
        Self {
            store,
            http,
            token_url: music.token_url.clone(),
            credentials: Credentials::from_config(music),
        }
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// A cached token that is still valid, if any.
    async fn cached(&self) -> Result<Option<CachedToken>> {
        let Some(raw) = self.store.get(ACCESS_TOKEN_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<CachedToken>(&raw) {
            Ok(token) if token.is_expired() => {
                tracing::debug!("cached access token past expires_at, refreshing");
                Ok(None)
            }
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable cached access token");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl TokenProvider for RefreshTokenProvider {
    async fn get_token(&self) -> Result<CachedToken> {
        if let Some(token) = self.cached().await? {
            tracing::debug!("using cached access token");
            return Ok(token);
        }
        self.refresh().await
    }

    async fn refresh(&self) -> Result<CachedToken> {
        let (client_id, client_secret, refresh_token) = self.credentials.for_refresh()?;
        let params = spotify::refresh_form_params(
            client_id,
            client_secret.expose_secret(),
            refresh_token.expose_secret(),
        );

        let resp = self.http.post(&self.token_url).form(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "token exchange rejected");
            return Err(FolioError::UpstreamAuth {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = resp.json().await?;
        let grant = spotify::parse_token_response(&json)?;

        match grant.expires_in {
            Some(secs) if secs > 0 => {
                let value = serde_json::to_string(&grant.token)?;
                self.store
                    .set(ACCESS_TOKEN_KEY, &value, Some(Duration::from_secs(secs)))
                    .await?;
            }
            _ => tracing::warn!(
                expires_in = ?grant.expires_in,
                "token endpoint advertised no lifetime, not caching"
            ),
        }
        tracing::info!(expires_in = ?grant.expires_in, "access token refreshed");
        Ok(grant.token)
    }
}
