use thiserror::Error;

/// Errors raised when a workflow snapshot is looked up or rejected by the session store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),

    #[error("Workflow '{0}' is already open")]
    WorkflowAlreadyOpen(String),

    #[error("Workflow must have a non-empty name")]
    EmptyName,

    #[error("Node '{node_id}' not found in workflow '{workflow_id}'")]
    NodeNotFound { workflow_id: String, node_id: String },

    #[error("Node '{node_id}' in workflow '{workflow_id}' is locked")]
    NodeLocked { workflow_id: String, node_id: String },

    #[error("Edge '{edge_id}' not found in workflow '{workflow_id}'")]
    EdgeNotFound { workflow_id: String, edge_id: String },

    #[error("Duplicate node id '{0}'")]
    DuplicateNode(String),

    #[error("Node '{node_id}' references unknown parent '{parent_id}'")]
    UnknownParent { node_id: String, parent_id: String },

    #[error("Node '{node_id}' has parent '{parent_id}', which is not a batch node")]
    ParentNotBatch { node_id: String, parent_id: String },

    #[error("Parent relation contains a cycle through node '{0}'")]
    ParentCycle(String),

    #[error("Edge '{edge_id}' references unknown node '{node_id}'")]
    UnknownEdgeEndpoint { edge_id: String, node_id: String },
}

impl WorkflowError {
    /// True for errors caused by a malformed snapshot rather than a missing or conflicting workflow
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            WorkflowError::WorkflowNotFound(_)
                | WorkflowError::WorkflowAlreadyOpen(_)
                | WorkflowError::NodeNotFound { .. }
                | WorkflowError::EdgeNotFound { .. }
                | WorkflowError::NodeLocked { .. }
        )
    }
}
