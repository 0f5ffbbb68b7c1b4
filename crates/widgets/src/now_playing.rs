//! Now-playing pipeline: token, then the currently-playing endpoint.

use async_trait::async_trait;
use folio_config::MusicConfig;
use folio_types::{
    Fetched, FolioError, NowPlaying, TokenProvider, WidgetSource, traits::Result,
};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;

use crate::UpstreamHttp;

#[derive(Debug, Deserialize)]
struct CurrentlyPlaying {
    #[serde(default)]
    is_playing: bool,
    item: Option<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    name: String,
    #[serde(default)]
    artists: Vec<Artist>,
    album: Option<Album>,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct Artist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Album {
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

impl Track {
    fn into_now_playing(self, is_playing: bool) -> NowPlaying {
        let track = self;
        NowPlaying {
            track_name: track.name,
            artist_names: track.artists.into_iter().map(|a| a.name).collect(),
            album_art_url: track
                .album
                .and_then(|album| album.images.into_iter().next())
                .map(|image| image.url),
            external_url: track.external_urls.spotify,
            is_playing,
        }
    }
}

/// Parse a currently-playing response body. An empty body or a null `item`
/// means nothing is playing.
fn parse_currently_playing(body: &str) -> Result<Option<NowPlaying>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let parsed: CurrentlyPlaying = serde_json::from_str(body)
        .map_err(|e| FolioError::Parse(format!("currently-playing response: {e}")))?;
    Ok(parsed
        .item
        .map(|track| track.into_now_playing(parsed.is_playing)))
}

/// Fetches the listener's current track.
pub struct NowPlayingFetcher {
    tokens: Arc<dyn TokenProvider>,
    http: UpstreamHttp,
    endpoint: String,
}

impl NowPlayingFetcher {
    pub fn new(tokens: Arc<dyn TokenProvider>, http: UpstreamHttp, music: &MusicConfig) -> Self {
        Self {
            tokens,
            http,
            endpoint: music.now_playing_url.clone(),
        }
    }

    /// Run the pipeline, returning `None` when nothing is playing.
    ///
    /// # Errors
    ///
    /// Propagates token provider errors, [`FolioError::UpstreamFetch`] for a
    /// non-2xx response and [`FolioError::Parse`] for an unreadable body.
    pub async fn fetch(&self) -> Result<Option<NowPlaying>> {
        let token = self.tokens.get_token().await?;
        let resp = self
            .http
            .send(
                self.http
                    .client()
                    .get(&self.endpoint)
                    .header(reqwest::header::AUTHORIZATION, token.bearer()),
            )
            .await?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let body = resp.text().await?;
        parse_currently_playing(&body)
    }
}

#[async_trait]
impl WidgetSource for NowPlayingFetcher {
    type Output = NowPlaying;

    async fn current(&self) -> Fetched<NowPlaying> {
        let result = self.fetch().await;
        match &result {
            Ok(Some(track)) => {
                tracing::debug!(track = %track.track_name, "now playing");
            }
            Ok(None) => tracing::debug!("nothing playing"),
            Err(e) if e.is_config() => {
                tracing::error!(error = %e, "now-playing widget misconfigured");
            }
            Err(e) => tracing::warn!(error = %e, "now-playing widget unavailable"),
        }
        Fetched::from_result(result, "nothing playing")
    }
}
