/// Workflow Management Layer
///
/// This module holds the workflow model and the in-memory session store:
/// - Type definitions (Workflow, Node, Edge) in the canvas JSON shape
/// - Hot-swap session store using ArcSwap, validating every snapshot

// Core workflow type definitions
pub mod types;

// Session store for open workflows
pub mod registry;

// Re-export commonly used types
pub use registry::{CompiledWorkflow, WorkflowRegistry};
pub use types::{Edge, Measured, Node, NodeData, NodeType, Position, Workflow};
