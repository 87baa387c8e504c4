//! Workflow graph as a tagged-state enum and transition table
//!
//! The report workflow is a small fixed-shape state machine:
//!
//! ```text
//! initial_plan → research_plan → write ─┬→ accept
//!                                  ▲    ├→ reject
//!                                  │    └→ review → research_revise ─┘
//! ```
//!
//! Every edge is unconditional except the one out of `Write`, which is
//! labelled by a [`Decision`]. Encoding the graph as an enum plus a
//! transition function keeps it directly unit-testable with no graph
//! library in the loop.

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// One discrete processing step in the report pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowNode {
    /// Produce the outline from the task description
    InitialPlan,
    /// Gather references keyed off the outline
    ResearchPlan,
    /// Produce or revise the draft
    Write,
    /// Critique the current draft
    Review,
    /// Gather references keyed off the critique
    ResearchRevise,
    /// Terminal: the report is done
    Accept,
    /// Terminal: the report is abandoned
    Reject,
}

impl WorkflowNode {
    /// The workflow entry point
    pub const ENTRY: WorkflowNode = WorkflowNode::InitialPlan;

    /// Check whether this node ends the run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accept | Self::Reject)
    }

    /// Stable node name for logging and traces
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitialPlan => "initial_plan",
            Self::ResearchPlan => "research_plan",
            Self::Write => "write",
            Self::Review => "review",
            Self::ResearchRevise => "research_revise",
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }
}

/// Branch label chosen by the decision function after a writing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// The draft is good enough (or the ceiling forced it)
    Accepted,
    /// Send the draft through another review cycle
    ToReview,
    /// Abandon the report
    Rejected,
}

impl Decision {
    /// Stable label name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::ToReview => "to_review",
            Self::Rejected => "rejected",
        }
    }
}

/// The transition table.
///
/// `decision` must be `Some` exactly when leaving [`WorkflowNode::Write`];
/// any other combination is a programming error and surfaces as
/// [`AgentError::Transition`] rather than a panic.
pub fn next_node(
    current: WorkflowNode,
    decision: Option<Decision>,
) -> Result<WorkflowNode, AgentError> {
    use WorkflowNode::*;

    match (current, decision) {
        (InitialPlan, None) => Ok(ResearchPlan),
        (ResearchPlan, None) => Ok(Write),
        (Review, None) => Ok(ResearchRevise),
        (ResearchRevise, None) => Ok(Write),

        (Write, Some(Decision::Accepted)) => Ok(Accept),
        (Write, Some(Decision::ToReview)) => Ok(Review),
        (Write, Some(Decision::Rejected)) => Ok(Reject),
        (Write, None) => Err(AgentError::transition(
            current,
            "the writing step requires a decision label",
        )),

        (Accept | Reject, _) => Err(AgentError::transition(
            current,
            "terminal node has no successor",
        )),

        (_, Some(d)) => Err(AgentError::transition(
            current,
            format!("unexpected decision label '{}'", d.as_str()),
        )),
    }
}
