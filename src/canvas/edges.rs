/// Edge wiring for connection gestures

use crate::workflow::types::Edge;
use serde::{Deserialize, Serialize};

/// A completed connection gesture between two handles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
}

/// Deterministic id for the edge created by `connection`
pub fn edge_id(connection: &Connection) -> String {
    format!(
        "xy-edge__{}{}-{}{}",
        connection.source,
        connection.source_handle.as_deref().unwrap_or(""),
        connection.target,
        connection.target_handle.as_deref().unwrap_or(""),
    )
}

/// Add the edge for `connection` unless the same wiring already exists
pub fn connect(edges: &[Edge], connection: &Connection) -> Vec<Edge> {
    let exists = edges.iter().any(|e| {
        e.source == connection.source
            && e.target == connection.target
            && e.source_handle == connection.source_handle
            && e.target_handle == connection.target_handle
    });
    if exists {
        tracing::debug!("Connection '{}' already exists", edge_id(connection));
        return edges.to_vec();
    }

    let mut updated = edges.to_vec();
    updated.push(Edge {
        id: edge_id(connection),
        source: connection.source.clone(),
        target: connection.target.clone(),
        source_handle: connection.source_handle.clone(),
        target_handle: connection.target_handle.clone(),
    });
    updated
}

/// Remove the edge with `edge_id`; `None` when no such edge exists
pub fn disconnect(edges: &[Edge], edge_id: &str) -> Option<Vec<Edge>> {
    if !edges.iter().any(|e| e.id == edge_id) {
        return None;
    }
    Some(edges.iter().filter(|e| e.id != edge_id).cloned().collect())
}
