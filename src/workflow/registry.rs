/// Hot-swap session store for open workflows using ArcSwap
///
/// Holds the authoritative node and edge snapshots of every open workflow.
/// Readers get lock-free access to the current snapshot; every update swaps
/// the whole map pointer, so a reader never observes a half-applied change.
/// Writers are serialised so each canvas event is applied against the
/// snapshot produced by the previous one.

use crate::error::WorkflowError;
use crate::workflow::types::{Edge, Node, Workflow};
use arc_swap::ArcSwap;
use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use tokio::sync::Mutex;

/// Session store for open workflows
///
/// Every snapshot passes through `compile_workflow` before it becomes visible,
/// so the store only ever holds collections that satisfy the parent invariants.
#[derive(Debug, Default)]
pub struct WorkflowRegistry {
    /// Thread-safe atomic pointer to workflow map
    /// Key: workflow_id, Value: validated workflow snapshot
    workflows: ArcSwap<HashMap<String, CompiledWorkflow>>,

    /// Serialises writers; readers never take it
    writer: Mutex<()>,
}

/// Validated workflow snapshot with canvas metadata
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledWorkflow {
    /// Workflow with nodes ordered so every parent precedes its children
    pub workflow: Workflow,
}

impl WorkflowRegistry {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a workflow for editing
    ///
    /// Fails if a workflow with the same id is already open.
    pub async fn open_workflow(
        &self,
        workflow: Workflow,
    ) -> Result<CompiledWorkflow, WorkflowError> {
        let _guard = self.writer.lock().await;

        if self.workflows.load().contains_key(&workflow.id) {
            return Err(WorkflowError::WorkflowAlreadyOpen(workflow.id));
        }

        let compiled = compile_workflow(workflow)?;
        self.store(compiled.clone());

        tracing::info!(
            "Opened workflow: {} ({} nodes, {} edges)",
            compiled.workflow.id,
            compiled.workflow.nodes.len(),
            compiled.workflow.edges.len()
        );

        Ok(compiled)
    }

    /// Replace the full snapshot of an open workflow
    pub async fn replace_workflow(
        &self,
        workflow: Workflow,
    ) -> Result<CompiledWorkflow, WorkflowError> {
        let _guard = self.writer.lock().await;

        if !self.workflows.load().contains_key(&workflow.id) {
            return Err(WorkflowError::WorkflowNotFound(workflow.id));
        }

        let compiled = compile_workflow(workflow)?;
        self.store(compiled.clone());

        tracing::info!("Replaced workflow snapshot: {}", compiled.workflow.id);

        Ok(compiled)
    }

    /// Apply `update` to the node collection of an open workflow
    ///
    /// The resulting snapshot is validated before it is published; a rejected
    /// snapshot leaves the previous one in place.
    pub async fn update_nodes<F>(
        &self,
        workflow_id: &str,
        update: F,
    ) -> Result<CompiledWorkflow, WorkflowError>
    where
        F: FnOnce(Vec<Node>) -> Vec<Node>,
    {
        let _guard = self.writer.lock().await;

        let mut workflow = self.current(workflow_id)?;
        workflow.nodes = update(std::mem::take(&mut workflow.nodes));

        let compiled = compile_workflow(workflow)?;
        self.store(compiled.clone());

        tracing::debug!("Updated nodes of workflow: {}", workflow_id);

        Ok(compiled)
    }

    /// Apply `update` to the edge collection of an open workflow
    pub async fn update_edges<F>(
        &self,
        workflow_id: &str,
        update: F,
    ) -> Result<CompiledWorkflow, WorkflowError>
    where
        F: FnOnce(Vec<Edge>) -> Vec<Edge>,
    {
        let _guard = self.writer.lock().await;

        let mut workflow = self.current(workflow_id)?;
        workflow.edges = update(std::mem::take(&mut workflow.edges));

        let compiled = compile_workflow(workflow)?;
        self.store(compiled.clone());

        tracing::debug!("Updated edges of workflow: {}", workflow_id);

        Ok(compiled)
    }

    /// Get a workflow snapshot by ID (lock-free read)
    pub fn get_workflow(&self, workflow_id: &str) -> Option<CompiledWorkflow> {
        self.workflows.load().get(workflow_id).cloned()
    }

    /// List open workflow IDs, sorted
    pub fn list_workflow_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.workflows.load().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Close a workflow; returns whether it was open
    pub async fn close_workflow(&self, workflow_id: &str) -> bool {
        let _guard = self.writer.lock().await;

        let current = self.workflows.load();
        if !current.contains_key(workflow_id) {
            return false;
        }

        let mut new_registry = (**current).clone();
        new_registry.remove(workflow_id);
        self.workflows.store(Arc::new(new_registry));

        tracing::info!("Closed workflow: {}", workflow_id);
        true
    }

    fn current(&self, workflow_id: &str) -> Result<Workflow, WorkflowError> {
        self.workflows
            .load()
            .get(workflow_id)
            .map(|compiled| compiled.workflow.clone())
            .ok_or_else(|| WorkflowError::WorkflowNotFound(workflow_id.to_string()))
    }

    /// Clone current map, insert, and swap atomically; callers hold the writer lock
    fn store(&self, compiled: CompiledWorkflow) {
        let current = self.workflows.load();
        let mut new_registry = (**current).clone();
        new_registry.insert(compiled.workflow.id.clone(), compiled);
        self.workflows.store(Arc::new(new_registry));
    }
}

/// Validate a workflow snapshot and normalise its node order
///
/// Checks:
/// - non-empty name and unique node ids
/// - every parent exists and is a batch node
/// - the parent relation is acyclic
/// - every edge endpoint exists
pub fn compile_workflow(mut workflow: Workflow) -> Result<CompiledWorkflow, WorkflowError> {
    if workflow.name.trim().is_empty() {
        return Err(WorkflowError::EmptyName);
    }

    let mut by_id: HashMap<&str, &Node> = HashMap::with_capacity(workflow.nodes.len());
    for node in &workflow.nodes {
        if by_id.insert(node.id.as_str(), node).is_some() {
            return Err(WorkflowError::DuplicateNode(node.id.clone()));
        }
    }

    for node in &workflow.nodes {
        let Some(parent_id) = node.parent_id.as_deref() else {
            continue;
        };
        match by_id.get(parent_id) {
            None => {
                return Err(WorkflowError::UnknownParent {
                    node_id: node.id.clone(),
                    parent_id: parent_id.to_string(),
                })
            }
            Some(parent) if !parent.is_batch() => {
                return Err(WorkflowError::ParentNotBatch {
                    node_id: node.id.clone(),
                    parent_id: parent_id.to_string(),
                })
            }
            Some(_) => {}
        }
    }

    check_parent_cycles(&workflow.nodes)?;

    for edge in &workflow.edges {
        for endpoint in [&edge.source, &edge.target] {
            if !by_id.contains_key(endpoint.as_str()) {
                return Err(WorkflowError::UnknownEdgeEndpoint {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }

    workflow.nodes = order_parents_first(std::mem::take(&mut workflow.nodes));

    Ok(CompiledWorkflow { workflow })
}

/// Build the parent -> child graph and reject cycles
fn check_parent_cycles(nodes: &[Node]) -> Result<(), WorkflowError> {
    let mut graph = DiGraph::<&str, ()>::new();
    let indices: HashMap<&str, _> = nodes
        .iter()
        .map(|n| (n.id.as_str(), graph.add_node(n.id.as_str())))
        .collect();

    for node in nodes {
        if let Some(parent) = node.parent_id.as_deref().and_then(|p| indices.get(p)) {
            graph.add_edge(*parent, indices[node.id.as_str()], ());
        }
    }

    toposort(&graph, None)
        .map(|_| ())
        .map_err(|cycle| WorkflowError::ParentCycle(graph[cycle.node_id()].to_string()))
}

/// Stable reorder so each parent comes before its children
///
/// Assumes the parent relation is acyclic.
fn order_parents_first(nodes: Vec<Node>) -> Vec<Node> {
    let position: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), i))
        .collect();

    let mut placed = HashSet::with_capacity(nodes.len());
    let mut order = Vec::with_capacity(nodes.len());

    for start in 0..nodes.len() {
        // Collect the unplaced ancestor chain, then emit it root-first
        let mut chain = Vec::new();
        let mut current = Some(start);
        while let Some(i) = current {
            if placed.contains(&i) {
                break;
            }
            chain.push(i);
            current = nodes[i].parent_id.as_ref().and_then(|p| position.get(p).copied());
        }
        for &i in chain.iter().rev() {
            placed.insert(i);
            order.push(i);
        }
    }

    let mut slots: Vec<Option<Node>> = nodes.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::types::NodeType;

    fn workflow(nodes: Vec<Node>) -> Workflow {
        Workflow {
            id: "wf".to_string(),
            name: "Test".to_string(),
            nodes,
            edges: vec![],
        }
    }

    #[test]
    fn orders_parents_before_children() {
        let compiled = compile_workflow(workflow(vec![
            Node::new("a", NodeType::Reader, 0.0, 0.0).with_parent("inner"),
            Node::new("w", NodeType::Writer, 0.0, 0.0),
            Node::new("inner", NodeType::Batch, 0.0, 0.0).with_parent("outer"),
            Node::new("outer", NodeType::Batch, 0.0, 0.0),
        ]))
        .unwrap();

        let ids: Vec<&str> = compiled.workflow.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["outer", "inner", "a", "w"]);
    }

    #[test]
    fn rejects_non_batch_parent() {
        let result = compile_workflow(workflow(vec![
            Node::new("r", NodeType::Reader, 0.0, 0.0),
            Node::new("w", NodeType::Writer, 0.0, 0.0).with_parent("r"),
        ]));
        assert_eq!(
            result.unwrap_err(),
            WorkflowError::ParentNotBatch {
                node_id: "w".to_string(),
                parent_id: "r".to_string()
            }
        );
    }

    #[test]
    fn rejects_unknown_parent_and_duplicates() {
        let unknown = compile_workflow(workflow(vec![
            Node::new("w", NodeType::Writer, 0.0, 0.0).with_parent("ghost"),
        ]));
        assert!(matches!(unknown, Err(WorkflowError::UnknownParent { .. })));

        let duplicate = compile_workflow(workflow(vec![
            Node::new("w", NodeType::Writer, 0.0, 0.0),
            Node::new("w", NodeType::Reader, 0.0, 0.0),
        ]));
        assert_eq!(duplicate.unwrap_err(), WorkflowError::DuplicateNode("w".to_string()));
    }

    #[test]
    fn rejects_parent_cycles() {
        let result = compile_workflow(workflow(vec![
            Node::new("a", NodeType::Batch, 0.0, 0.0).with_parent("b"),
            Node::new("b", NodeType::Batch, 0.0, 0.0).with_parent("a"),
        ]));
        assert!(matches!(result, Err(WorkflowError::ParentCycle(_))));
    }

    #[test]
    fn rejects_dangling_edges() {
        let mut wf = workflow(vec![Node::new("a", NodeType::Reader, 0.0, 0.0)]);
        wf.edges.push(Edge {
            id: "e1".to_string(),
            source: "a".to_string(),
            target: "missing".to_string(),
            source_handle: None,
            target_handle: None,
        });
        assert!(matches!(
            compile_workflow(wf),
            Err(WorkflowError::UnknownEdgeEndpoint { .. })
        ));
    }

    #[tokio::test]
    async fn rejected_update_keeps_previous_snapshot() {
        let registry = WorkflowRegistry::new();
        registry
            .open_workflow(workflow(vec![Node::new("a", NodeType::Reader, 0.0, 0.0)]))
            .await
            .unwrap();

        let result = registry
            .update_nodes("wf", |mut nodes| {
                nodes[0].parent_id = Some("ghost".to_string());
                nodes
            })
            .await;
        assert!(result.is_err());

        let current = registry.get_workflow("wf").unwrap();
        assert_eq!(current.workflow.nodes[0].parent_id, None);
    }

    #[tokio::test]
    async fn open_twice_conflicts_and_close_removes() {
        let registry = WorkflowRegistry::new();
        registry.open_workflow(workflow(vec![])).await.unwrap();

        assert_eq!(
            registry.open_workflow(workflow(vec![])).await.unwrap_err(),
            WorkflowError::WorkflowAlreadyOpen("wf".to_string())
        );
        assert_eq!(registry.list_workflow_ids(), vec!["wf".to_string()]);

        assert!(registry.close_workflow("wf").await);
        assert!(!registry.close_workflow("wf").await);
        assert!(registry.get_workflow("wf").is_none());
    }

    #[tokio::test]
    async fn update_on_closed_workflow_is_not_found() {
        let registry = WorkflowRegistry::new();
        let result = registry.update_edges("nope", |edges| edges).await;
        assert_eq!(result.unwrap_err(), WorkflowError::WorkflowNotFound("nope".to_string()));
    }
}
