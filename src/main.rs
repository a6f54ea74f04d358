//! Movies API entry point
//!
//! Loads configuration, opens the database, and serves GraphQL at /graphql.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movies_api::config::{Config, LogFormat};
use movies_api::db::{Database, schema_sync};
use movies_api::graphql::build_schema;
use movies_api::services::MovieService;
use movies_api::{AppState, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    init_tracing(config.log_format);

    tracing::info!("Starting Movies API");
    tracing::info!("Configuration loaded");

    ensure_database_dir(&config.database_url)?;
    let db = Database::connect_with_retry(
        &config.database_url,
        config.database_max_connections,
        config.database_connect_timeout,
    )
    .await?;
    tracing::info!("Database connected");

    let sync = schema_sync::sync_schema(db.pool()).await;
    if !sync.tables_created.is_empty() {
        tracing::info!(tables = ?sync.tables_created, "Created missing tables");
    }
    for err in &sync.errors {
        tracing::error!(error = %err, "Schema sync error");
    }
    if !sync.errors.is_empty() {
        anyhow::bail!("Schema sync failed with {} error(s)", sync.errors.len());
    }

    match db.movies().count().await {
        Ok(count) => tracing::info!(movies = count, "Catalogue loaded"),
        Err(e) => tracing::warn!(error = %e, "Could not count movies"),
    }

    let service = MovieService::new(Arc::new(db.clone()));
    let schema = build_schema(service);
    tracing::info!("GraphQL schema built");

    let state = AppState {
        db: db.clone(),
        schema,
    };
    let app = build_app(state);

    let host = config.host.as_deref().unwrap_or("0.0.0.0");
    let addr: SocketAddr = format!("{}:{}", host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, config.port))?;
    tracing::info!("Listening on {}", addr);
    tracing::info!("GraphQL playground: http://localhost:{}/graphql", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Shut down");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "movies_api=debug,tower_http=debug".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

/// SQLite creates the file but not its parent directory
fn ensure_database_dir(url: &str) -> anyhow::Result<()> {
    let Some(path) = url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let path = path.trim_start_matches("//");
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
