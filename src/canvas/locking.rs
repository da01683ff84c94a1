/// Node locking
///
/// A locked node is reserved by one editor; the flag lives in the node payload
/// so every collaborator sees it.

use crate::workflow::types::Node;

/// Flip the `locked` flag of `node_id`
///
/// Returns the new collection and the node's new flag, or `None` when the
/// node does not exist.
pub fn toggle_lock(nodes: &[Node], node_id: &str) -> Option<(Vec<Node>, bool)> {
    let current = nodes.iter().find(|n| n.id == node_id)?;
    let locked = !current.data.locked;

    let updated = nodes
        .iter()
        .map(|n| {
            let mut n = n.clone();
            if n.id == node_id {
                n.data.locked = locked;
            }
            n
        })
        .collect();

    Some((updated, locked))
}

/// Ids of all locked nodes, in collection order
pub fn locked_node_ids(nodes: &[Node]) -> Vec<String> {
    nodes
        .iter()
        .filter(|n| n.data.locked)
        .map(|n| n.id.clone())
        .collect()
}
