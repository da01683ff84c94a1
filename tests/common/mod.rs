//! Common test utilities for building canvas snapshots.
use flow_editor::{Node, NodeType, Workflow};

/// A measured batch node at an absolute position.
#[allow(dead_code)]
pub fn batch(id: &str, x: f64, y: f64, width: f64, height: f64) -> Node {
    Node::new(id, NodeType::Batch, x, y).with_size(width, height)
}

/// A measured transformer node.
#[allow(dead_code)]
pub fn transformer(id: &str, x: f64, y: f64) -> Node {
    Node::new(id, NodeType::Transformer, x, y).with_size(40.0, 40.0)
}

/// Find a node by id, panicking with a readable message when absent.
#[allow(dead_code)]
pub fn node<'a>(nodes: &'a [Node], id: &str) -> &'a Node {
    nodes
        .iter()
        .find(|n| n.id == id)
        .unwrap_or_else(|| panic!("node '{id}' missing"))
}

/// Workflow with one batch at (100,100) sized 200x200, a node inside it, and a
/// detached node far away.
///
/// Layout:
/// - `batch-1`: container
/// - `inside`: child of `batch-1` at relative (50,50)
/// - `outside`: detached at (600,600)
#[allow(dead_code)]
pub fn create_canvas_workflow() -> Workflow {
    Workflow {
        id: "wf-canvas".to_string(),
        name: "Canvas".to_string(),
        nodes: vec![
            batch("batch-1", 100.0, 100.0, 200.0, 200.0),
            transformer("inside", 50.0, 50.0).with_parent("batch-1"),
            transformer("outside", 600.0, 600.0),
        ],
        edges: vec![],
    }
}
