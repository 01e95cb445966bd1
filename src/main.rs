//! pool-matcher server entry point.
//!
//! Starts the Axum HTTP server with the REST endpoints.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pool_matcher::api;
use pool_matcher::app_state::AppState;
use pool_matcher::config::{LogFormat, MatcherConfig};
use pool_matcher::notify::{LoggingNotifier, Notifier, RetryPolicy, RetryingNotifier};
use pool_matcher::persistence::{InMemoryStore, MatchStore, PostgresStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = MatcherConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting pool-matcher");

    // Build persistence layer
    let store: Arc<dyn MatchStore> = if config.persistence_enabled {
        let store = PostgresStore::connect(&config)
            .await
            .context("connecting to PostgreSQL")?;
        tracing::info!("using PostgreSQL store");
        Arc::new(store)
    } else {
        tracing::warn!("persistence disabled, state is kept in memory only");
        Arc::new(InMemoryStore::new())
    };

    // Build notification layer
    let notifier: Arc<dyn Notifier> = Arc::new(RetryingNotifier::new(
        LoggingNotifier::new(),
        RetryPolicy::from_config(&config),
    ));

    // Build application state
    let app_state = AppState::new(store, notifier, &config);

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
