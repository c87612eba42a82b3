use std::net::SocketAddr;

use station_console::cache::StationQueryCache;
use station_console::config::{BackendConfig, ConfigError, ConsoleConfig};
use station_console::notify::NoticeBoard;
use station_console::repository::RepositoryError;
use station_console::store::StationStore;
use station_console::web::{AppState, create_router};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("failed to initialise logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to open stations backend: {0}")]
    Backend(#[from] RepositoryError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

fn init_logging() -> Result<(), StartupError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| StartupError::Logging(e.to_string()))
}

async fn run() -> Result<(), StartupError> {
    init_logging()?;

    let config = ConsoleConfig::from_env()?;
    if let BackendConfig::Memory { seed_file } = &config.backend {
        tracing::warn!(
            seed_file = ?seed_file,
            "SUPABASE_URL not set, serving an in-memory stations table"
        );
    }

    let backend = config.build_backend()?;
    tracing::info!(backend = backend.describe(), "stations backend ready");

    let cache = StationQueryCache::new(backend, &config.cache_config());
    let state = AppState::new(StationStore::new(cache, NoticeBoard::new()));
    let app = create_router(state, &config.static_dir);

    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!("EV station console listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(StartupError::Serve)
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("station console startup failed: {err}");
        std::process::exit(1);
    }
}
