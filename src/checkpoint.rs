//! Run-scoped snapshot trace store
//!
//! An optional collaborator for the runner: every snapshot is saved as it is
//! produced, and the trace is released unconditionally when the run ends,
//! whether it succeeded or aborted. Released traces stay readable, which is
//! how partial snapshots from a failed run remain available for diagnostics.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::AgentError;
use crate::runner::Snapshot;

/// Durable (or at least externally inspectable) storage for run traces.
///
/// Single writer per task id: the runner owns the trace for the duration of
/// one run and calls `release` exactly once at run end.
#[async_trait]
pub trait TraceCheckpointer: Send + Sync {
    /// Append a snapshot to the trace for a task
    async fn save(&self, task_id: &str, snapshot: &Snapshot) -> Result<(), AgentError>;

    /// Close the trace for a task; no further saves are accepted
    async fn release(&self, task_id: &str) -> Result<(), AgentError>;
}

#[derive(Debug, Default, Clone)]
struct TaskTrace {
    snapshots: Vec<Snapshot>,
    released: bool,
}

/// In-memory trace store, the transient equivalent of the original's
/// in-memory checkpoint database
#[derive(Debug, Default)]
pub struct MemoryCheckpointer {
    traces: Mutex<HashMap<String, TaskTrace>>,
}

impl MemoryCheckpointer {
    /// Create an empty trace store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the recorded trace for a task, if any
    pub async fn trace(&self, task_id: &str) -> Option<Vec<Snapshot>> {
        self.traces
            .lock()
            .await
            .get(task_id)
            .map(|t| t.snapshots.clone())
    }

    /// Check whether a task's trace has been released
    pub async fn is_released(&self, task_id: &str) -> bool {
        self.traces
            .lock()
            .await
            .get(task_id)
            .map(|t| t.released)
            .unwrap_or(false)
    }

    /// Task ids with recorded traces
    pub async fn task_ids(&self) -> Vec<String> {
        self.traces.lock().await.keys().cloned().collect()
    }
}

#[async_trait]
impl TraceCheckpointer for MemoryCheckpointer {
    async fn save(&self, task_id: &str, snapshot: &Snapshot) -> Result<(), AgentError> {
        let mut traces = self.traces.lock().await;
        let trace = traces.entry(task_id.to_string()).or_default();
        if trace.released {
            return Err(AgentError::Checkpoint(format!(
                "trace for task {task_id} is already released"
            )));
        }
        trace.snapshots.push(snapshot.clone());
        Ok(())
    }

    async fn release(&self, task_id: &str) -> Result<(), AgentError> {
        let mut traces = self.traces.lock().await;
        let trace = traces.entry(task_id.to_string()).or_default();
        trace.released = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WorkflowNode;
    use crate::state::ReportState;

    fn snapshot(node: WorkflowNode) -> Snapshot {
        Snapshot {
            node,
            state: ReportState::new("t", 1),
        }
    }

    #[tokio::test]
    async fn test_save_and_read_trace() {
        let store = MemoryCheckpointer::new();

        store
            .save("task-1", &snapshot(WorkflowNode::InitialPlan))
            .await
            .unwrap();
        store
            .save("task-1", &snapshot(WorkflowNode::ResearchPlan))
            .await
            .unwrap();

        let trace = store.trace("task-1").await.unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].node, WorkflowNode::InitialPlan);
        assert_eq!(trace[1].node, WorkflowNode::ResearchPlan);
    }

    #[tokio::test]
    async fn test_released_trace_stays_readable() {
        let store = MemoryCheckpointer::new();
        store
            .save("task-1", &snapshot(WorkflowNode::InitialPlan))
            .await
            .unwrap();

        store.release("task-1").await.unwrap();

        assert!(store.is_released("task-1").await);
        assert_eq!(store.trace("task-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_after_release_is_rejected() {
        let store = MemoryCheckpointer::new();
        store.release("task-1").await.unwrap();

        let err = store
            .save("task-1", &snapshot(WorkflowNode::Write))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Checkpoint(_)));
    }

    #[tokio::test]
    async fn test_unknown_task_has_no_trace() {
        let store = MemoryCheckpointer::new();
        assert!(store.trace("missing").await.is_none());
        assert!(!store.is_released("missing").await);
    }
}
