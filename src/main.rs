//! vidrank server entry point.
//!
//! Starts the Axum HTTP server with the chart and ingestion endpoints.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use vidrank::api;
use vidrank::app_state::AppState;
use vidrank::config::AppConfig;
use vidrank::ingest::{IngestionPipeline, SnapshotPolicy};
use vidrank::persistence::VideoStore;
use vidrank::persistence::postgres::PostgresStore;
use vidrank::service::RankingService;
use vidrank::source::youtube::YouTubeSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting vidrank");

    // Connect to the store and apply migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let store: Arc<dyn VideoStore> = Arc::new(PostgresStore::new(pool));

    // Build the ingestion pipeline
    let source = Arc::new(YouTubeSource::with_base(
        reqwest::Client::new(),
        config.youtube_api_key.clone(),
        config.youtube_api_base.clone(),
    ));
    let pipeline = Arc::new(IngestionPipeline::new(
        source,
        Arc::clone(&store),
        config.playlists.clone(),
        SnapshotPolicy::new(config.snapshot_write_mode),
    ));

    // Build the query service and application state
    let ranking = Arc::new(RankingService::new(Arc::clone(&store)));
    let app_state = AppState { ranking, pipeline };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
