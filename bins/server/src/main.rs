//! Palco API Server
//!
//! Main entry point for the Palco backend service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palco_api::{AppState, create_router};
use palco_core::storage::{StorageConfig, StorageService};
use palco_db::Repository;
use palco_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palco=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Select the repository backend
    let repo = Repository::from_config(&config.database)
        .await
        .context("failed to initialize repository")?;
    info!(backend = repo.backend_name(), "repository ready");

    // Create attachment storage
    let storage_config =
        StorageConfig::try_from(&config.storage).context("invalid storage configuration")?;
    let storage = StorageService::from_config(storage_config)
        .context("failed to initialize attachment storage")?;
    info!(
        provider = storage.provider_name(),
        max_file_size = storage.config().max_file_size,
        "attachment storage configured"
    );

    // Create router
    let app = create_router(AppState::new(repo, storage));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
