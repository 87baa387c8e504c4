//! Error types for the report workflow
//!
//! Collaborator failures (generation, search) are fatal to the run in which
//! they occur and carry no automatic retry. Configuration errors are raised
//! before workflow execution begins. Verdict-parse failures are the one
//! non-fatal kind: the decision step fails open into another revision pass.

use thiserror::Error;

use crate::graph::WorkflowNode;

/// Top-level error for workflow construction and execution
#[derive(Debug, Error)]
pub enum AgentError {
    /// Missing or invalid configuration, raised at setup
    #[error("Configuration error: {0}")]
    Config(String),

    /// The generation collaborator failed
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The search collaborator failed
    #[error("Search failed: {0}")]
    Search(String),

    /// The transition table was consulted with an impossible input
    #[error("Invalid transition from {node:?}: {detail}")]
    Transition { node: WorkflowNode, detail: String },

    /// The runner exceeded its step bound
    #[error("Superstep limit exceeded: {0}")]
    SuperstepLimit(usize),

    /// Checkpoint trace operation failed
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),
}

impl AgentError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create a search error
    pub fn search(message: impl Into<String>) -> Self {
        Self::Search(message.into())
    }

    /// Create a transition error
    pub fn transition(node: WorkflowNode, detail: impl Into<String>) -> Self {
        Self::Transition {
            node,
            detail: detail.into(),
        }
    }
}

/// The editor verdict could not be read as a yes/no answer.
///
/// Never fatal: the decision step treats an unparseable verdict as
/// "not sufficiently revised" and records the incident in the state trace.
#[derive(Debug, Clone, Error)]
#[error("Could not parse a yes/no verdict from: {0:?}")]
pub struct VerdictParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(AgentError: Send, Sync);
    static_assertions::assert_impl_all!(VerdictParseError: Send, Sync);

    #[test]
    fn test_error_display() {
        let err = AgentError::config("OPENAI_API_KEY is not set");
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        let err = AgentError::SuperstepLimit(12);
        assert_eq!(err.to_string(), "Superstep limit exceeded: 12");
    }

    #[test]
    fn test_transition_error_names_node() {
        let err = AgentError::transition(WorkflowNode::Accept, "terminal node has no successor");
        assert!(err.to_string().contains("Accept"));
    }

    #[test]
    fn test_verdict_parse_error_carries_text() {
        let err = VerdictParseError("maybe?".to_string());
        assert!(err.to_string().contains("maybe?"));
    }
}
