// Main entry point for the aggregation server

use std::sync::Arc;

use aggregator_core::kernel::{CacheStore, FilePersistence, ServerDeps, SystemClock};
use aggregator_core::{server::build_app, Config};
use anyhow::{Context, Result};
use catalog_client::CatalogClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,aggregator_core=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting aggregation server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    let settings = config.pipeline_settings();
    tracing::info!(
        ttl_secs = config.cache_ttl_secs,
        persist = config.cache_persist_path.is_some(),
        single_flight = settings.single_flight,
        "Configuration loaded"
    );

    // Load cache (persisted image is read fully before serving)
    let clock = Arc::new(SystemClock);
    let cache = match &config.cache_persist_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading persisted cache");
            let persistence = Arc::new(FilePersistence::new(path.clone()));
            CacheStore::load(settings.cache_ttl, clock, persistence).await
        }
        None => CacheStore::new(settings.cache_ttl, clock),
    };

    let client = CatalogClient::new(settings.upstream_timeout)
        .context("Failed to create upstream HTTP client")?;
    let deps = ServerDeps::from_client(Arc::new(client), Arc::new(cache), settings);

    // Build application
    let app = build_app(deps);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
