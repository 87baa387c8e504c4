//! Workflow runner
//!
//! Drives the transition table from `initial_plan` to a terminal node,
//! collecting one state snapshot per node execution. Each run is a fresh,
//! finite execution; the returned snapshot sequence is the task's result.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::checkpoint::TraceCheckpointer;
use crate::error::AgentError;
use crate::graph::{next_node, Decision, WorkflowNode};
use crate::nodes::WorkflowNodes;
use crate::state::{Outcome, ReportState, ReportUpdate};

/// The state record captured immediately after a node finishes executing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The node that just executed
    pub node: WorkflowNode,
    /// The state after applying that node's patch
    pub state: ReportState,
}

/// Per-run options
#[derive(Debug, Clone, Default)]
pub struct TaskOptions {
    /// Revision ceiling; 0 force-accepts the first draft
    pub max_revisions: usize,

    /// Manual decision override, consulted after the ceiling check.
    ///
    /// This is the path that makes the `reject` terminal reachable.
    pub decision_override: Option<Decision>,

    /// Explicit trace id; a fresh one is generated when absent
    pub task_id: Option<String>,
}

impl TaskOptions {
    /// Options with the given revision ceiling
    pub fn new(max_revisions: usize) -> Self {
        Self {
            max_revisions,
            ..Default::default()
        }
    }

    /// Force a decision label for every pass of this run
    pub fn with_decision_override(mut self, decision: Decision) -> Self {
        self.decision_override = Some(decision);
        self
    }

    /// Set an explicit trace id
    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }
}

/// Drives a report task through the workflow graph
pub struct WorkflowRunner {
    nodes: WorkflowNodes,
    checkpointer: Option<Arc<dyn TraceCheckpointer>>,
}

impl WorkflowRunner {
    /// Create a runner over a set of node functions
    pub fn new(nodes: WorkflowNodes) -> Self {
        Self {
            nodes,
            checkpointer: None,
        }
    }

    /// Attach a trace checkpointer, acquired per run and released at run end
    pub fn with_checkpointer(mut self, checkpointer: Arc<dyn TraceCheckpointer>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    /// Execute a task with the given revision ceiling (default surface)
    pub async fn run_task(
        &self,
        task: impl Into<String>,
        max_revisions: usize,
    ) -> Result<Vec<Snapshot>, AgentError> {
        self.run_task_with_options(task, TaskOptions::new(max_revisions))
            .await
    }

    /// Execute a task with full per-run options
    pub async fn run_task_with_options(
        &self,
        task: impl Into<String>,
        options: TaskOptions,
    ) -> Result<Vec<Snapshot>, AgentError> {
        let task = task.into();
        let task_id = options
            .task_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        info!(
            task_id = %task_id,
            max_revisions = options.max_revisions,
            "starting report task"
        );

        let result = self.drive(&task_id, &task, &options).await;

        // Release the trace unconditionally, success or failure.
        if let Some(checkpointer) = &self.checkpointer {
            if let Err(e) = checkpointer.release(&task_id).await {
                warn!(task_id = %task_id, error = %e, "failed to release trace");
            }
        }

        match &result {
            Ok(snapshots) => info!(
                task_id = %task_id,
                steps = snapshots.len(),
                "report task finished"
            ),
            Err(e) => warn!(task_id = %task_id, error = %e, "report task aborted"),
        }

        result
    }

    async fn drive(
        &self,
        task_id: &str,
        task: &str,
        options: &TaskOptions,
    ) -> Result<Vec<Snapshot>, AgentError> {
        let mut state = ReportState::new(task, options.max_revisions);
        let mut snapshots = Vec::new();
        let mut node = WorkflowNode::ENTRY;

        // Generous bound; unreachable under the documented policy since the
        // ceiling forces acceptance.
        let step_limit = superstep_limit(options.max_revisions);

        for _ in 0..step_limit {
            debug!(node = node.name(), revision = state.revision_number, "executing node");

            let update = match node {
                WorkflowNode::InitialPlan => self.nodes.plan(&state).await?,
                WorkflowNode::ResearchPlan => self.nodes.research_plan(&state).await?,
                WorkflowNode::Write => self.nodes.write(&state).await?,
                WorkflowNode::Review => self.nodes.review(&state).await?,
                WorkflowNode::ResearchRevise => self.nodes.research_critique(&state).await?,
                WorkflowNode::Accept => ReportUpdate::empty().with_outcome(Outcome::Accepted),
                WorkflowNode::Reject => ReportUpdate::empty().with_outcome(Outcome::Rejected),
            };

            state = state.apply_update(update);

            let snapshot = Snapshot {
                node,
                state: state.clone(),
            };
            if let Some(checkpointer) = &self.checkpointer {
                checkpointer.save(task_id, &snapshot).await?;
            }
            snapshots.push(snapshot);

            if node.is_terminal() {
                return Ok(snapshots);
            }

            node = if node == WorkflowNode::Write {
                let (decision, decision_update) = self
                    .nodes
                    .decide(&state, options.decision_override)
                    .await?;
                // A fail-open verdict leaves its mark on the state so the
                // incident shows up in subsequent snapshots.
                if !decision_update.is_empty() {
                    state = state.apply_update(decision_update);
                }
                debug!(decision = decision.as_str(), "branching after write");
                next_node(node, Some(decision))?
            } else {
                next_node(node, None)?
            };
        }

        Err(AgentError::SuperstepLimit(step_limit))
    }
}

/// Step bound for a run: the fixed prologue plus one full revision cycle per
/// allowed revision, with slack for the terminal node.
fn superstep_limit(max_revisions: usize) -> usize {
    3 * (max_revisions + 2) + 4
}
