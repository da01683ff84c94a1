/// Flow Editor: canvas interaction core for a visual workflow editor
///
/// This library provides batch containment for dropped nodes, node locking and
/// edge wiring, on top of an ArcSwap session store served over axum.

// Core configuration and setup
pub mod config;

// Domain errors raised by the session store
pub mod error;

// Workflow model and in-memory session store
pub mod workflow;

// Canvas geometry, layout queries and interaction handlers
pub mod canvas;

// HTTP API layer - workflow sessions and canvas events
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use canvas::{CanvasLayout, ContainmentMode, ContainmentResolver, NodeLayout, Transition};
pub use error::WorkflowError;
pub use server::{create_app, start_server};
pub use workflow::{Edge, Node, NodeType, Workflow, WorkflowRegistry};
