/// Server setup and initialization
///
/// Wires together the session store and HTTP routes and provides the main
/// application factory function for creating the Axum app.

use crate::{
    api::{create_canvas_routes, create_workflow_routes, AppState},
    config::Config,
    workflow::WorkflowRegistry,
};
use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Create the main Axum application with all routes
///
/// The session store starts empty; workflows are opened through the API.
pub fn create_app(config: &Config) -> Router {
    tracing::info!("📊 Initializing workflow session store");
    let registry = Arc::new(WorkflowRegistry::new());

    let app_state = AppState {
        registry,
        canvas: config.canvas.clone(),
    };

    tracing::info!(
        "📡 Creating HTTP router (containment mode: {:?})",
        config.canvas.containment
    );
    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))

        // Workflow session API routes
        .merge(create_workflow_routes())

        // Canvas event routes
        .merge(create_canvas_routes())
        .with_state(app_state)
}

/// Start the HTTP server with the given configuration
///
/// Installs the tracing subscriber, creates the application, and serves it on
/// the configured address and port.
pub async fn start_server(config: Config) -> Result<()> {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting flow editor server...");

    let app = create_app(&config);

    // Bind to the configured address
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
