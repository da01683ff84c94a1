/// Core workflow type definitions
///
/// Defines the workflow, node, and edge structures exchanged with the canvas.
/// Field names follow the canvas library's JSON (camelCase) so snapshots can be
/// passed through unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A complete workflow definition containing nodes and their connections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Unique workflow identifier (e.g., "wf-etl")
    pub id: String,
    /// Human-readable workflow name
    pub name: String,
    /// List of nodes drawn on the canvas
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// List of edges connecting nodes
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// A single node on the workflow canvas
///
/// `position` is relative to the parent batch when `parent_id` is set and
/// absolute otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique node identifier within the workflow (e.g., "reader-1")
    pub id: String,
    /// The type tag of the node
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Position in canvas coordinates
    pub position: Position,
    /// Containing batch node, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Size reported by the rendering layer after layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured: Option<Measured>,
    /// Node payload
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    /// Create a detached, unmeasured node at the given position
    pub fn new(id: impl Into<String>, node_type: NodeType, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            node_type,
            position: Position { x, y },
            parent_id: None,
            measured: None,
            data: NodeData::default(),
        }
    }

    /// Builder-style helper to set the measured size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.measured = Some(Measured {
            width: Some(width),
            height: Some(height),
        });
        self
    }

    /// Builder-style helper to attach the node to a batch
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Whether this node is a grouping container
    pub fn is_batch(&self) -> bool {
        matches!(self.node_type, NodeType::Batch)
    }
}

/// Available node types on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Data source node
    Reader,
    /// Data sink node
    Writer,
    /// Processing node between readers and writers
    Transformer,
    /// Grouping container; other nodes may be parented to it
    Batch,
    /// Free-text annotation
    Note,
}

/// Canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Size measured by the rendering layer; either dimension may be missing
/// until layout has been committed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measured {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Node payload
///
/// Known editor fields are typed; everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeData {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether the node is locked for editing
    #[serde(default)]
    pub locked: bool,
    /// Arbitrary additional payload
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Connection between two nodes on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique edge identifier
    pub id: String,
    /// Source node ID
    pub source: String,
    /// Target node ID
    pub target: String,
    /// Output handle on the source node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Input handle on the target node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}
