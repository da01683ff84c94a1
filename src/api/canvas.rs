/// Canvas event endpoints
///
/// Each request is one completed gesture on the editor canvas. The handler
/// runs the matching interaction logic against the current snapshot inside
/// the store's update function, so events on a workflow apply one at a time.

use crate::{
    api::{status_for, AppState},
    canvas::{
        batch::{ContainmentResolver, Transition},
        edges::{connect, disconnect, Connection},
        layout::NodeLayout,
        locking::{locked_node_ids, toggle_lock},
    },
    error::WorkflowError,
    workflow::types::{Edge, Node, Position},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, post},
    Router,
};
use serde::{Deserialize, Serialize};

/// Request body for a node drop
#[derive(Debug, Deserialize)]
pub struct DropRequest {
    /// Live position at release, in the node's current parent frame
    pub position: Position,
}

/// Node state after a drop
#[derive(Debug, Serialize)]
pub struct DropResponse {
    pub node: Node,
    pub transition: Option<Transition>,
}

/// Lock state after a toggle
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockResponse {
    pub node_id: String,
    pub locked: bool,
    pub locked_node_ids: Vec<String>,
}

/// Edge collection after a connection
#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub edges: Vec<Edge>,
}

/// Create canvas event routes
pub fn create_canvas_routes() -> Router<AppState> {
    Router::new()
        .route("/api/workflows/{id}/nodes/{node_id}/drop", post(drop_node))
        .route("/api/workflows/{id}/nodes/{node_id}/lock", post(lock_node))
        .route("/api/workflows/{id}/edges", post(connect_edge))
        .route("/api/workflows/{id}/edges/{edge_id}", delete(disconnect_edge))
}

/// Move a node to its drop position and resolve batch membership
///
/// POST /api/workflows/{id}/nodes/{node_id}/drop
/// Body: { "position": { "x": 500.0, "y": 500.0 } }
///
/// Locked nodes are refused with 409 and the snapshot is left untouched.
async fn drop_node(
    State(state): State<AppState>,
    Path((workflow_id, node_id)): Path<(String, String)>,
    Json(payload): Json<DropRequest>,
) -> Result<Json<DropResponse>, StatusCode> {
    let mode = state.canvas.containment;
    let mut found = false;
    let mut locked = false;
    let mut transition = None;

    let result = state
        .registry
        .update_nodes(&workflow_id, |nodes| {
            let Some(current) = nodes.iter().find(|n| n.id == node_id) else {
                return nodes;
            };
            found = true;
            if current.data.locked {
                locked = true;
                return nodes;
            }

            let mut dropped = current.clone();
            dropped.position = payload.position;
            let moved: Vec<Node> = nodes
                .iter()
                .map(|n| if n.id == node_id { dropped.clone() } else { n.clone() })
                .collect();

            let layout = NodeLayout::new(&nodes).with_drag(&node_id, payload.position.into());
            let mut next = None;
            ContainmentResolver::new(&layout)
                .with_mode(mode)
                .handle_node_drop_in_batch(&dropped, &moved, |updated| next = Some(updated));

            let next = next.unwrap_or(moved);
            transition = next
                .iter()
                .find(|n| n.id == node_id)
                .and_then(|after| Transition::between(&dropped, after));
            next
        })
        .await;

    let compiled = result.map_err(|e| {
        tracing::error!("Failed to apply drop of '{}' in {}: {}", node_id, workflow_id, e);
        status_for(&e)
    })?;

    if locked {
        let err = WorkflowError::NodeLocked {
            workflow_id: workflow_id.clone(),
            node_id: node_id.clone(),
        };
        tracing::warn!("{}", err);
        return Err(status_for(&err));
    }

    let node = compiled
        .workflow
        .nodes
        .into_iter()
        .find(|n| n.id == node_id)
        .filter(|_| found)
        .ok_or_else(|| not_found(&workflow_id, &node_id))?;

    Ok(Json(DropResponse { node, transition }))
}

/// Toggle the lock flag of a node
///
/// POST /api/workflows/{id}/nodes/{node_id}/lock
async fn lock_node(
    State(state): State<AppState>,
    Path((workflow_id, node_id)): Path<(String, String)>,
) -> Result<Json<LockResponse>, StatusCode> {
    let mut locked = None;

    let compiled = state
        .registry
        .update_nodes(&workflow_id, |nodes| match toggle_lock(&nodes, &node_id) {
            Some((updated, flag)) => {
                locked = Some(flag);
                updated
            }
            None => nodes,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to toggle lock of '{}' in {}: {}", node_id, workflow_id, e);
            status_for(&e)
        })?;

    let locked = locked.ok_or_else(|| not_found(&workflow_id, &node_id))?;
    tracing::info!("Node '{}' in {} locked={}", node_id, workflow_id, locked);

    Ok(Json(LockResponse {
        node_id,
        locked,
        locked_node_ids: locked_node_ids(&compiled.workflow.nodes),
    }))
}

/// Add an edge for a connection gesture
///
/// POST /api/workflows/{id}/edges
/// Body: { "source": "...", "target": "...", "sourceHandle": "...", "targetHandle": "..." }
async fn connect_edge(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
    Json(connection): Json<Connection>,
) -> Result<Json<ConnectResponse>, StatusCode> {
    let compiled = state
        .registry
        .update_edges(&workflow_id, |edges| connect(&edges, &connection))
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect edge in {}: {}", workflow_id, e);
            status_for(&e)
        })?;

    Ok(Json(ConnectResponse {
        edges: compiled.workflow.edges,
    }))
}

/// Remove an edge by id
///
/// DELETE /api/workflows/{id}/edges/{edge_id}
async fn disconnect_edge(
    State(state): State<AppState>,
    Path((workflow_id, edge_id)): Path<(String, String)>,
) -> Result<Json<ConnectResponse>, StatusCode> {
    let mut removed = false;

    let compiled = state
        .registry
        .update_edges(&workflow_id, |edges| match disconnect(&edges, &edge_id) {
            Some(remaining) => {
                removed = true;
                remaining
            }
            None => edges,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to remove edge '{}' in {}: {}", edge_id, workflow_id, e);
            status_for(&e)
        })?;

    if !removed {
        let err = WorkflowError::EdgeNotFound { workflow_id, edge_id };
        tracing::warn!("{}", err);
        return Err(status_for(&err));
    }
    tracing::info!("Removed edge '{}' from {}", edge_id, workflow_id);

    Ok(Json(ConnectResponse {
        edges: compiled.workflow.edges,
    }))
}

fn not_found(workflow_id: &str, node_id: &str) -> StatusCode {
    let err = WorkflowError::NodeNotFound {
        workflow_id: workflow_id.to_string(),
        node_id: node_id.to_string(),
    };
    tracing::warn!("{}", err);
    status_for(&err)
}
