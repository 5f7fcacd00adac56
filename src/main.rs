use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use flickcraze::config::{Cli, Config};
use flickcraze::state::AppState;
use flickcraze::uploads::UploadStore;
use flickcraze::{db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli)?;
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Ensure uploads directory exists
    std::fs::create_dir_all(config.uploads_path())?;
    tracing::info!("Uploads directory: {}", config.uploads_path().display());

    // Initialize database
    let pool = db::create_pool(&config.db_path())?;
    db::run_migrations(&pool)?;
    tracing::info!("Database ready: {}", config.db_path().display());

    tracing::info!("Password storage: {:?}", config.auth.password_storage);

    let state = AppState {
        db: pool,
        uploads: UploadStore::new(config.uploads_path()),
        config: config.clone(),
    };

    let app = routes::app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
