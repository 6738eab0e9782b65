//! guishop-editor server entry point.
//!
//! Starts the Axum HTTP server backing the shop configuration editor.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use guishop_editor::api;
use guishop_editor::app_state::AppState;
use guishop_editor::config::EditorConfig;
use guishop_editor::persistence::{ActivityStore, ConfigFileStore};
use guishop_editor::service::EditorService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = EditorConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!(addr = %config.listen_addr, config_dir = %config.config_dir.display(), "starting guishop-editor");

    // Build stores
    let files = Arc::new(ConfigFileStore::new(config.config_dir.clone()));
    let activity_store = if config.activity_persistence_enabled {
        Some(ActivityStore::connect(&config.activity_db_url).await?)
    } else {
        tracing::warn!("activity log persistence disabled; the log will not survive restarts");
        None
    };

    // Build the editing session and run the initial load
    let editor = Arc::new(EditorService::new(
        files,
        activity_store,
        config.username.clone(),
        Duration::from_millis(config.autosave_debounce_ms),
    ));
    editor.load_all().await?;

    // Build application state
    let app_state = AppState { editor };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
