/// Canvas Interaction Layer
///
/// Handlers for the editor's canvas gestures. They take the current node or
/// edge snapshot and produce the next one; the session store decides whether
/// to accept it.
/// - Geometry and intersection tests (kurbo)
/// - Layout queries over a snapshot with drag overrides
/// - Batch containment for dropped nodes
/// - Node locking and edge wiring

pub mod geometry;

pub mod layout;

// Batch adoption/release on drop
pub mod batch;

pub mod locking;

pub mod edges;

pub use batch::{ContainmentResolver, Transition};
pub use geometry::ContainmentMode;
pub use layout::{CanvasLayout, NodeLayout};
