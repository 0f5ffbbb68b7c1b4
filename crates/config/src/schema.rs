use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variables read without the `FOLIO_` prefix, mapped into `music.*`.
const SPOTIFY_ENV: &[&str] = &[
    "SPOTIFY_CLIENT_ID",
    "SPOTIFY_CLIENT_SECRET",
    "SPOTIFY_REFRESH_TOKEN",
    "SPOTIFY_REDIRECT_URI",
];

fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Music-service credentials and endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Long-lived refresh credential obtained once with `folio authorize`.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Only used by `folio authorize`.
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default = "MusicConfig::default_token_url")]
    pub token_url: String,
    #[serde(default = "MusicConfig::default_now_playing_url")]
    pub now_playing_url: String,
}

impl MusicConfig {
    fn default_token_url() -> String {
        "https://accounts.spotify.com/api/token".to_string()
    }
    fn default_now_playing_url() -> String {
        "https://api.spotify.com/v1/me/player/currently-playing".to_string()
    }
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            refresh_token: None,
            redirect_uri: None,
            token_url: Self::default_token_url(),
            now_playing_url: Self::default_now_playing_url(),
        }
    }
}

/// CSS selectors used to scrape a catalog book page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    pub title: String,
    pub author: String,
    pub cover: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            title: ".Text__title1".to_string(),
            author: ".ContributorLink".to_string(),
            cover: ".ResponsiveImage".to_string(),
        }
    }
}

/// Book catalog location and scraping selectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "CatalogConfig::default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

impl CatalogConfig {
    fn default_base_url() -> String {
        "https://www.goodreads.com".to_string()
    }

    /// URL of the catalog page for `book_id`.
    #[must_use]
    pub fn book_url(&self, book_id: i64) -> String {
        format!("{}/book/show/{book_id}", self.base_url.trim_end_matches('/'))
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            selectors: SelectorConfig::default(),
        }
    }
}

/// Which key-value backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local; nothing survives a restart.
    #[default]
    Memory,
    Sqlite,
    Redis,
}

impl StoreBackend {
    /// Whether entries outlive the process.
    #[must_use]
    pub fn is_durable(self) -> bool {
        !matches!(self, Self::Memory)
    }
}

/// Key-value store selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// `sqlite://…` or `redis://…` URL; unused by the memory backend.
    #[serde(default)]
    pub url: Option<String>,
}

/// Outbound HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "HttpConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "HttpConfig::default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl HttpConfig {
    fn default_timeout_secs() -> u64 {
        10
    }
    fn default_user_agent() -> String {
        concat!("folio/", env!("CARGO_PKG_VERSION")).to_string()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
            user_agent: Self::default_user_agent(),
            proxy_url: None,
        }
    }
}

/// A social link shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub label: String,
    pub url: String,
}

/// Static bio content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    pub tagline: String,
    /// One is picked at random for every render.
    #[serde(default)]
    pub facts: Vec<String>,
    #[serde(default)]
    pub links: Vec<LinkConfig>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "SJSANC".to_string(),
            tagline: "software engineer".to_string(),
            facts: Vec::new(),
            links: vec![LinkConfig {
                label: "Github".to_string(),
                url: "https://github.com/sjsanc".to_string(),
            }],
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "LogConfig::default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl LogConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Listen port (defaults to 3000).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Listen address (defaults to `127.0.0.1`).
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub music: MusicConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            music: MusicConfig::default(),
            catalog: CatalogConfig::default(),
            store: StoreConfig::default(),
            http: HttpConfig::default(),
            profile: ProfileConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid or extraction fails.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Loads configuration from a file path, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be read or parsed.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: &Path) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .extract()
    }

    /// Loads defaults, then the optional YAML file, then the environment.
    ///
    /// `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`, `SPOTIFY_REFRESH_TOKEN` and
    /// `SPOTIFY_REDIRECT_URI` fill the `music` section; any other setting can be
    /// overridden with `FOLIO_`-prefixed variables, nesting with `__`
    /// (e.g. `FOLIO_STORE__BACKEND=redis`).
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if a source cannot be read or parsed.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(spotify_env())
            .merge(Env::prefixed("FOLIO_").split("__"))
            .extract()
    }
}

fn spotify_env() -> Env {
    Env::raw().only(SPOTIFY_ENV).map(|key| {
        key.as_str()
            .to_ascii_lowercase()
            .replacen("spotify_", "music.", 1)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_YAML: &str = r#"
port: 8080
host: "0.0.0.0"
music:
  client_id: "cid"
  client_secret: "secret"
  refresh_token: "refresh"
catalog:
  base_url: "http://localhost:9999/"
  selectors:
    title: "h1"
    author: ".author"
    cover: "img.cover"
store:
  backend: redis
  url: "redis://127.0.0.1:6379"
profile:
  name: "Ada"
  tagline: "engineer"
  facts:
    - "Octopuses have three hearts."
  links:
    - label: "Github"
      url: "https://github.com/ada"
"#;

    #[test]
    fn test_default_config() {
        let c = Config::default();
        assert_eq!(c.port, 3000);
        assert_eq!(c.host, "127.0.0.1");
        assert_eq!(c.store.backend, StoreBackend::Memory);
        assert!(c.music.refresh_token.is_none());
        assert_eq!(c.http.timeout_secs, 10);
        assert_eq!(c.catalog.selectors.title, ".Text__title1");
    }

    #[test]
    fn test_from_yaml_port_and_host() {
        let c = Config::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.host, "0.0.0.0");
    }

    #[test]
    fn test_from_yaml_music_credentials() {
        let c = Config::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(c.music.client_id.as_deref(), Some("cid"));
        assert_eq!(c.music.refresh_token.as_deref(), Some("refresh"));
        // endpoints keep their defaults
        assert_eq!(c.music.token_url, "https://accounts.spotify.com/api/token");
    }

    #[test]
    fn test_from_yaml_catalog_and_store() {
        let c = Config::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(c.catalog.selectors.cover, "img.cover");
        assert_eq!(c.store.backend, StoreBackend::Redis);
        assert_eq!(c.store.url.as_deref(), Some("redis://127.0.0.1:6379"));
    }

    #[test]
    fn test_from_yaml_profile() {
        let c = Config::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(c.profile.name, "Ada");
        assert_eq!(c.profile.facts.len(), 1);
        assert_eq!(c.profile.links[0].url, "https://github.com/ada");
    }

    #[test]
    fn test_from_yaml_defaults_applied() {
        let c = Config::from_yaml("port: 1234").unwrap();
        assert_eq!(c.port, 1234);
        assert_eq!(c.host, "127.0.0.1");
        assert_eq!(c.catalog.base_url, "https://www.goodreads.com");
    }

    #[test]
    fn test_from_yaml_rejects_unknown_backend() {
        assert!(Config::from_yaml("store:\n  backend: dynamo\n").is_err());
    }

    #[test]
    fn test_store_backend_durability() {
        assert!(!StoreConfig::default().backend.is_durable());
        assert!(StoreBackend::Sqlite.is_durable());
        assert!(StoreBackend::Redis.is_durable());
    }

    #[test]
    fn test_book_url_trims_trailing_slash() {
        let c = Config::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(c.catalog.book_url(42), "http://localhost:9999/book/show/42");
        assert_eq!(
            CatalogConfig::default().book_url(16634),
            "https://www.goodreads.com/book/show/16634"
        );
    }

    #[test]
    fn test_load_reads_spotify_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SPOTIFY_CLIENT_ID", "env-cid");
            jail.set_env("SPOTIFY_REFRESH_TOKEN", "env-refresh");
            let c = Config::load(None)?;
            assert_eq!(c.music.client_id.as_deref(), Some("env-cid"));
            assert_eq!(c.music.refresh_token.as_deref(), Some("env-refresh"));
            assert!(c.music.client_secret.is_none());
            Ok(())
        });
    }

    #[test]
    fn test_load_prefixed_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("folio.yaml", "port: 4000\nstore:\n  backend: sqlite\n")?;
            jail.set_env("FOLIO_PORT", "5000");
            jail.set_env("FOLIO_STORE__URL", "sqlite://folio.db");
            let c = Config::load(Some(Path::new("folio.yaml")))?;
            assert_eq!(c.port, 5000);
            assert_eq!(c.store.backend, StoreBackend::Sqlite);
            assert_eq!(c.store.url.as_deref(), Some("sqlite://folio.db"));
            Ok(())
        });
    }
}
