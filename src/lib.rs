//! research-assist: a plan/research/write/review workflow for short
//! research reports
//!
//! The workflow is a small fixed-shape state machine:
//!
//! ```text
//! initial_plan → research_plan → write ─┬→ accept
//!                                  ▲    ├→ reject
//!                                  │    └→ review → research_revise ─┘
//! ```
//!
//! All substantive work is delegated to two opaque collaborators: a
//! generation provider (LLM) and a search provider. The crate's own logic is
//! the transition table, the revision-loop termination policy, and the
//! snapshot trace each run produces.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use research_assist::{
//!     AgentConfig, OpenAiGeneration, TavilySearch, WorkflowNodes, WorkflowRunner,
//! };
//!
//! let config = AgentConfig::from_env()?;
//! let nodes = WorkflowNodes::new(
//!     Arc::new(OpenAiGeneration::from_config(&config)),
//!     Arc::new(TavilySearch::from_config(&config)),
//! );
//! let runner = WorkflowRunner::new(nodes);
//!
//! let snapshots = runner.run_task("quantum annealing basics", config.max_revisions).await?;
//! println!("{}", snapshots.last().unwrap().state.draft);
//! ```

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod graph;
pub mod llm;
pub mod nodes;
pub mod prompts;
pub mod runner;
pub mod search;
pub mod state;

// Re-exports for convenience
pub use checkpoint::{MemoryCheckpointer, TraceCheckpointer};
pub use config::AgentConfig;
pub use error::{AgentError, VerdictParseError};
pub use graph::{next_node, Decision, WorkflowNode};
pub use llm::{GenerationProvider, OpenAiGeneration};
pub use nodes::{parse_queries, parse_verdict, WorkflowNodes, MAX_QUERIES};
pub use prompts::ReportPrompts;
pub use runner::{Snapshot, TaskOptions, WorkflowRunner};
pub use search::{SearchProvider, TavilyError, TavilySearch};
pub use state::{Outcome, ReferenceNote, ReportState, ReportUpdate};
