/// HTTP API Layer
///
/// This module provides the REST endpoints the editor front-end calls:
/// - Workflow open/read/replace/close against the session store
/// - Canvas events: node drop, node lock toggle, edge connect/disconnect

use crate::{config::CanvasConfig, error::WorkflowError, workflow::WorkflowRegistry};
use axum::http::StatusCode;
use std::sync::Arc;

// Workflow session endpoints (POST/GET/PUT/DELETE)
pub mod workflows;

// Canvas interaction endpoints
pub mod canvas;

// Re-export router builders
pub use canvas::create_canvas_routes;
pub use workflows::create_workflow_routes;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Session store for open workflows
    pub registry: Arc<WorkflowRegistry>,
    /// Canvas interaction settings
    pub canvas: CanvasConfig,
}

/// Map a store error to the HTTP status returned to the editor
pub(crate) fn status_for(err: &WorkflowError) -> StatusCode {
    if err.is_validation() {
        return StatusCode::BAD_REQUEST;
    }
    match err {
        WorkflowError::WorkflowAlreadyOpen(_) | WorkflowError::NodeLocked { .. } => {
            StatusCode::CONFLICT
        }
        _ => StatusCode::NOT_FOUND,
    }
}
