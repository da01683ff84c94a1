/// Flow Editor server
///
/// Main entry point. Loads configuration from the environment and starts the
/// HTTP server with:
/// - Workflow session API at /api/workflows/*
/// - Canvas events at /api/workflows/{id}/nodes/* and /api/workflows/{id}/edges
/// - Health check at /healthz

use flow_editor::{config::Config, server::start_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:3004, full containment)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
