/// Batch containment for dropped nodes
///
/// When a drag gesture ends, the dropped node may have entered or left a batch
/// (grouping) node. Children store positions relative to their batch, so every
/// change of parent rewrites the position to keep the node where the user let
/// go of it.
///
/// Resolution runs in two phases so a single call always reaches a stable
/// result:
/// 1. Release: if the node's current batch no longer contains it, detach it.
/// 2. Adopt: if the node is (now) detached, the last batch in collection order
///    that contains it becomes its parent.

use crate::canvas::geometry::ContainmentMode;
use crate::canvas::layout::CanvasLayout;
use crate::workflow::types::{Node, Position};
use kurbo::{Point, Rect};
use serde::Serialize;

/// Parent/position change produced by a drop
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Transition {
    /// Detached node joined a batch; `position` is relative to it
    Adopt { container_id: String, position: Position },
    /// Node left its batch; `position` is absolute
    Release { container_id: String, position: Position },
    /// Node left one batch and landed in another within the same gesture
    Reparent { from: String, to: String, position: Position },
}

impl Transition {
    /// Parent the node has after the transition
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Transition::Adopt { container_id, .. } => Some(container_id),
            Transition::Release { .. } => None,
            Transition::Reparent { to, .. } => Some(to),
        }
    }

    /// Position the node has after the transition, in its new frame
    pub fn position(&self) -> Position {
        match self {
            Transition::Adopt { position, .. }
            | Transition::Release { position, .. }
            | Transition::Reparent { position, .. } => *position,
        }
    }

    /// Transition that turns `before` into `after`, if their parents differ
    ///
    /// Both are the same node; `position` is taken from `after`.
    pub fn between(before: &Node, after: &Node) -> Option<Self> {
        let position = after.position;
        match (before.parent_id.as_deref(), after.parent_id.as_deref()) {
            (None, Some(to)) => Some(Transition::Adopt {
                container_id: to.to_string(),
                position,
            }),
            (Some(from), None) => Some(Transition::Release {
                container_id: from.to_string(),
                position,
            }),
            (Some(from), Some(to)) if from != to => Some(Transition::Reparent {
                from: from.to_string(),
                to: to.to_string(),
                position,
            }),
            _ => None,
        }
    }

    /// Copy of `node` with the transition applied
    pub fn apply(&self, node: &Node) -> Node {
        Node {
            parent_id: self.parent_id().map(str::to_string),
            position: self.position(),
            ..node.clone()
        }
    }
}

/// Batch that can take part in containment checks
struct Container<'n> {
    id: &'n str,
    origin: Point,
    rect: Rect,
}

/// Decides batch adoption and release for dropped nodes
pub struct ContainmentResolver<'a, L: CanvasLayout + ?Sized> {
    layout: &'a L,
    mode: ContainmentMode,
}

impl<'a, L: CanvasLayout + ?Sized> ContainmentResolver<'a, L> {
    /// Create a resolver using full containment
    pub fn new(layout: &'a L) -> Self {
        Self {
            layout,
            mode: ContainmentMode::Full,
        }
    }

    /// Override the containment mode
    pub fn with_mode(mut self, mode: ContainmentMode) -> Self {
        self.mode = mode;
        self
    }

    /// Handle a completed drop: compute the next snapshot and hand it to `set_nodes`
    ///
    /// `set_nodes` is only invoked when the node's parent changes.
    pub fn handle_node_drop_in_batch<F>(&self, dropped: &Node, nodes: &[Node], set_nodes: F)
    where
        F: FnOnce(Vec<Node>),
    {
        if let Some(transition) = self.resolve(dropped, nodes) {
            tracing::info!("Node '{}' {:?}", dropped.id, transition);
            set_nodes(replace_node(nodes, transition.apply(dropped)));
        }
    }

    /// Return the node collection after evaluating the drop of `dropped`
    pub fn evaluate_drop(&self, dropped: &Node, nodes: &[Node]) -> Vec<Node> {
        match self.resolve(dropped, nodes) {
            Some(transition) => replace_node(nodes, transition.apply(dropped)),
            None => nodes.to_vec(),
        }
    }

    /// Decide what the drop of `dropped` does, without applying it
    pub fn resolve(&self, dropped: &Node, nodes: &[Node]) -> Option<Transition> {
        if !nodes.iter().any(|n| n.id == dropped.id) {
            tracing::warn!("Dropped node '{}' is not part of the collection", dropped.id);
            return None;
        }

        let containers = self.containers(dropped, nodes);
        let live = self
            .layout
            .live_position(&dropped.id)
            .unwrap_or_else(|| dropped.position.into());

        // Phase 1: release from the current batch
        let mut released_from = None;
        let mut absolute = live;
        if let Some(parent_id) = dropped.parent_id.as_deref() {
            let Some(parent) = containers.iter().find(|c| c.id == parent_id) else {
                tracing::debug!(
                    "Parent '{}' of '{}' has no committed layout; keeping node attached",
                    parent_id,
                    dropped.id
                );
                return None;
            };
            if self.intersects(dropped, parent) {
                return None;
            }
            absolute = live + parent.origin.to_vec2();
            released_from = Some(parent.id);
        }

        // Phase 2: adopt into the last batch that contains the node
        let target = containers
            .iter()
            .filter(|c| Some(c.id) != released_from)
            .filter(|c| self.intersects(dropped, c))
            .last();

        match (released_from, target) {
            (None, None) => None,
            (None, Some(container)) => Some(Transition::Adopt {
                container_id: container.id.to_string(),
                position: (absolute - container.origin).to_point().into(),
            }),
            (Some(from), None) => Some(Transition::Release {
                container_id: from.to_string(),
                position: absolute.into(),
            }),
            (Some(from), Some(container)) => Some(Transition::Reparent {
                from: from.to_string(),
                to: container.id.to_string(),
                position: (absolute - container.origin).to_point().into(),
            }),
        }
    }

    /// Batches with a committed layout that the node may join, in collection order
    fn containers<'n>(&self, dropped: &Node, nodes: &'n [Node]) -> Vec<Container<'n>> {
        nodes
            .iter()
            .filter(|n| n.is_batch() && n.id != dropped.id)
            .filter_map(|n| {
                let Some(size) = n.measured.and_then(|m| m.size()) else {
                    tracing::debug!("Skipping batch '{}' without measured size", n.id);
                    return None;
                };
                if is_descendant_of(nodes, &n.id, &dropped.id) {
                    return None;
                }
                let origin = self.layout.absolute_position(&n.id)?;
                Some(Container {
                    id: &n.id,
                    origin,
                    rect: Rect::from_origin_size(origin, size),
                })
            })
            .collect()
    }

    fn intersects(&self, dropped: &Node, container: &Container<'_>) -> bool {
        let hit = self
            .layout
            .is_node_intersecting(&dropped.id, container.rect, self.mode);
        tracing::debug!(
            "Node '{}' vs batch '{}' at {:?}: intersecting={}",
            dropped.id,
            container.id,
            container.rect,
            hit
        );
        hit
    }
}

/// Whether `node_id` sits somewhere below `ancestor_id` in the parent chain
fn is_descendant_of(nodes: &[Node], node_id: &str, ancestor_id: &str) -> bool {
    let mut current = nodes.iter().find(|n| n.id == node_id);
    let mut hops = 0;
    while let Some(node) = current {
        let Some(parent_id) = node.parent_id.as_deref() else {
            return false;
        };
        if parent_id == ancestor_id {
            return true;
        }
        hops += 1;
        if hops > nodes.len() {
            return false;
        }
        current = nodes.iter().find(|n| n.id == parent_id);
    }
    false
}

/// Swap `updated` into the collection in place of the node with the same id
fn replace_node(nodes: &[Node], updated: Node) -> Vec<Node> {
    nodes
        .iter()
        .map(|n| if n.id == updated.id { updated.clone() } else { n.clone() })
        .collect()
}
