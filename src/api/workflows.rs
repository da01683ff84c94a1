/// Workflow session REST API endpoints
///
/// Opens workflows into the session store, serves their current snapshot, and
/// closes them. All changes are published to readers atomically.

use crate::{api::{status_for, AppState}, workflow::types::Workflow};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Response for workflow open/replace operations
#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    pub id: String,
    pub message: String,
}

/// Request body carrying a full workflow snapshot
#[derive(Debug, Deserialize)]
pub struct WorkflowRequest {
    pub workflow: Workflow,
}

/// Create workflow session routes
pub fn create_workflow_routes() -> Router<AppState> {
    Router::new()
        .route("/api/workflows", post(open_workflow).get(list_workflows))
        .route(
            "/api/workflows/{id}",
            get(get_workflow).put(replace_workflow).delete(close_workflow),
        )
}

/// Open a workflow for editing
///
/// POST /api/workflows
/// Body: { "workflow": { "id": "...", "name": "...", "nodes": [...], "edges": [...] } }
/// An empty id is replaced with a generated one.
async fn open_workflow(
    State(state): State<AppState>,
    Json(payload): Json<WorkflowRequest>,
) -> Result<Json<WorkflowResponse>, StatusCode> {
    let mut workflow = payload.workflow;
    if workflow.id.is_empty() {
        workflow.id = uuid::Uuid::new_v4().to_string();
    }

    match state.registry.open_workflow(workflow).await {
        Ok(compiled) => Ok(Json(WorkflowResponse {
            id: compiled.workflow.id.clone(),
            message: format!("Workflow '{}' opened", compiled.workflow.name),
        })),
        Err(e) => {
            tracing::error!("Failed to open workflow: {}", e);
            Err(status_for(&e))
        }
    }
}

/// List open workflows
///
/// GET /api/workflows
/// Returns: { "workflows": ["...", ...] }
async fn list_workflows(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "workflows": state.registry.list_workflow_ids() }))
}

/// Get the current snapshot of a workflow
///
/// GET /api/workflows/{id}
async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Workflow>, StatusCode> {
    state
        .registry
        .get_workflow(&id)
        .map(|compiled| Json(compiled.workflow))
        .ok_or(StatusCode::NOT_FOUND)
}

/// Replace the snapshot of an open workflow
///
/// PUT /api/workflows/{id}
async fn replace_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<WorkflowRequest>,
) -> Result<Json<WorkflowResponse>, StatusCode> {
    let mut workflow = payload.workflow;

    // Ensure the workflow ID matches the URL parameter
    workflow.id = id;

    match state.registry.replace_workflow(workflow).await {
        Ok(compiled) => Ok(Json(WorkflowResponse {
            id: compiled.workflow.id.clone(),
            message: format!("Workflow '{}' updated", compiled.workflow.name),
        })),
        Err(e) => {
            tracing::error!("Failed to replace workflow: {}", e);
            Err(status_for(&e))
        }
    }
}

/// Close a workflow
///
/// DELETE /api/workflows/{id}
async fn close_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if state.registry.close_workflow(&id).await {
        Ok(Json(json!({ "message": "Workflow closed" })))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}
