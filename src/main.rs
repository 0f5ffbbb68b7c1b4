use anyhow::{Context as _, Result};
use arc_swap::ArcSwap;
use clap::{Parser, Subcommand};
use folio_auth::{Credentials, RefreshTokenProvider};
use folio_config::{Config, ConfigWatcher, LogConfig};
use folio_server::AppState;
use folio_widgets::{NowPlayingFetcher, NowReadingFetcher, UpstreamHttp, build_http_client};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "folio", about = "folio: personal portfolio page with live widgets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server.
    Serve {
        /// Path to the YAML configuration file.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Override the listening port (default: 3000).
        #[arg(short, long)]
        port: Option<u16>,
        /// Override the listening address (default: 127.0.0.1).
        #[arg(long)]
        host: Option<String>,
        /// Reload profile content when the configuration file changes.
        #[arg(long, requires = "config")]
        watch: bool,
    },
    /// Exchange a one-time authorization code for a refresh token.
    Authorize {
        /// The `code` query parameter from the authorization redirect.
        code: String,
        /// Path to the YAML configuration file.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            port,
            host,
            watch,
        } => cmd_serve(config, port, host, watch).await,
        Commands::Authorize { code, config } => cmd_authorize(code, config).await,
    }
}

fn init_tracing(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn cmd_serve(
    config_path: Option<PathBuf>,
    port: Option<u16>,
    host: Option<String>,
    watch: bool,
) -> Result<()> {
    let (live, watcher) = match config_path {
        Some(path) if watch => {
            let watcher = Arc::new(ConfigWatcher::new(path).context("config error")?);
            (watcher.arc(), Some(watcher))
        }
        path => {
            let config = Config::load(path.as_deref()).context("config error")?;
            (Arc::new(ArcSwap::from_pointee(config)), None)
        }
    };
    let config = live.load_full();
    init_tracing(&config.log);

    // Fail fast on settings the widgets cannot run without.
    Credentials::from_config(&config.music)
        .for_refresh()
        .context("music credentials")?;

    let store = folio_store::open_store(&config.store)
        .await
        .context("store error")?;
    let http = build_http_client(&config.http);

    let tokens = Arc::new(RefreshTokenProvider::new(
        Arc::clone(&store),
        http.clone(),
        &config.music,
    ));
    let now_playing = NowPlayingFetcher::new(tokens, UpstreamHttp::new(http.clone()), &config.music);
    let now_reading = NowReadingFetcher::new(
        Arc::clone(&store),
        UpstreamHttp::new(http),
        config.catalog.clone(),
    )
    .context("catalog selectors")?;

    if let Some(watcher) = watcher {
        watcher.watch();
    }

    let state = AppState::new(live, store, Arc::new(now_playing), Arc::new(now_reading));
    let app = folio_server::make_router(state);

    let addr = format!(
        "{}:{}",
        host.as_deref().unwrap_or(&config.host),
        port.unwrap_or(config.port)
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %addr, backend = ?config.store.backend, "folio listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn cmd_authorize(code: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config_path.as_deref()).context("config error")?;
    init_tracing(&config.log);

    let http = build_http_client(&config.http);
    let grant = folio_auth::authorize::exchange_code(&http, &config.music, &code)
        .await
        .context("authorization failed")?;

    println!("access_token:  {}", grant.token.access_token);
    match grant.refresh_token {
        Some(refresh) => {
            println!("refresh_token: {refresh}");
            eprintln!("set music.refresh_token (or SPOTIFY_REFRESH_TOKEN) to the value above");
        }
        None => eprintln!("the token endpoint returned no refresh token"),
    }
    Ok(())
}
