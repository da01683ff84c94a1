/// Canvas layout queries
///
/// The containment resolver never reads positions straight off the node
/// collection; it asks a `CanvasLayout`, which knows about in-flight drags and
/// how parent frames compose.

use crate::canvas::geometry::{is_rect_intersecting, node_rect, ContainmentMode};
use crate::workflow::types::Node;
use kurbo::{Point, Rect};
use std::collections::{HashMap, HashSet};

/// Resolved node geometry as seen by the rendering layer
pub trait CanvasLayout {
    /// Position in the node's current parent frame, including any drag in progress
    fn live_position(&self, node_id: &str) -> Option<Point>;

    /// Position in canvas space, composed along the parent chain
    fn absolute_position(&self, node_id: &str) -> Option<Point>;

    /// Absolute bounds of the node; unmeasured nodes collapse to a point
    fn node_bounds(&self, node_id: &str) -> Option<Rect>;

    /// Whether the node's bounds intersect `area`; unknown nodes never do
    fn is_node_intersecting(&self, node_id: &str, area: Rect, mode: ContainmentMode) -> bool {
        self.node_bounds(node_id)
            .map(|bounds| is_rect_intersecting(bounds, area, mode))
            .unwrap_or(false)
    }
}

/// Layout over a node snapshot with optional drag overrides
#[derive(Debug)]
pub struct NodeLayout<'a> {
    /// Node lookup by id
    nodes: HashMap<&'a str, &'a Node>,
    /// In-flight drag positions, in each node's current parent frame
    drags: HashMap<String, Point>,
}

impl<'a> NodeLayout<'a> {
    /// Build a layout over the given snapshot
    pub fn new(nodes: &'a [Node]) -> Self {
        Self {
            nodes: nodes.iter().map(|n| (n.id.as_str(), n)).collect(),
            drags: HashMap::new(),
        }
    }

    /// Record the live position of a node being dragged
    pub fn with_drag(mut self, node_id: impl Into<String>, position: Point) -> Self {
        self.drags.insert(node_id.into(), position);
        self
    }
}

impl CanvasLayout for NodeLayout<'_> {
    fn live_position(&self, node_id: &str) -> Option<Point> {
        if let Some(position) = self.drags.get(node_id) {
            return Some(*position);
        }
        self.nodes.get(node_id).map(|node| node.position.into())
    }

    fn absolute_position(&self, node_id: &str) -> Option<Point> {
        let node = self.nodes.get(node_id)?;
        let mut absolute = self.live_position(node_id)?;
        let mut visited = HashSet::from([node_id]);
        let mut parent_id = node.parent_id.as_deref();

        while let Some(id) = parent_id {
            if !visited.insert(id) {
                tracing::warn!("Parent cycle while resolving position of '{}'", node_id);
                return None;
            }
            // Dangling parents are treated as the canvas root
            let Some(parent) = self.nodes.get(id) else {
                break;
            };
            absolute += self.live_position(id)?.to_vec2();
            parent_id = parent.parent_id.as_deref();
        }

        Some(absolute)
    }

    fn node_bounds(&self, node_id: &str) -> Option<Rect> {
        let node = self.nodes.get(node_id)?;
        let origin = self.absolute_position(node_id)?;
        Some(node_rect(origin, node.measured.and_then(|m| m.size())))
    }
}
