//! Node functions for the report workflow
//!
//! One async function per workflow node. Each takes the current state and
//! returns a [`ReportUpdate`] patch; the decision step additionally returns
//! the branch label for the transition table. All collaborator calls run
//! sequentially, so note ordering is deterministic.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{AgentError, VerdictParseError};
use crate::graph::Decision;
use crate::llm::GenerationProvider;
use crate::prompts::ReportPrompts;
use crate::search::SearchProvider;
use crate::state::{ReportState, ReportUpdate};

/// Upper bound on search queries per research step
pub const MAX_QUERIES: usize = 5;

/// The agent step functions, bound to a pair of collaborators
pub struct WorkflowNodes {
    generation: Arc<dyn GenerationProvider>,
    search: Arc<dyn SearchProvider>,
}

impl WorkflowNodes {
    /// Create the node set from its collaborators
    pub fn new(generation: Arc<dyn GenerationProvider>, search: Arc<dyn SearchProvider>) -> Self {
        Self { generation, search }
    }

    /// Planning step: task → outline
    pub async fn plan(&self, state: &ReportState) -> Result<ReportUpdate, AgentError> {
        info!(task = %state.task, "planning report outline");

        let plan = self
            .generation
            .generate(&ReportPrompts::planner(), &state.task)
            .await?;

        Ok(ReportUpdate::empty().with_plan(plan))
    }

    /// Research-for-plan step: outline → queries → notes
    pub async fn research_plan(&self, state: &ReportState) -> Result<ReportUpdate, AgentError> {
        info!("researching from outline");
        self.run_queries(ReportPrompts::plan_queries(), &state.plan)
            .await
    }

    /// Research-for-revision step: critique → queries → notes
    pub async fn research_critique(&self, state: &ReportState) -> Result<ReportUpdate, AgentError> {
        info!("researching from critique");
        self.run_queries(ReportPrompts::critique_queries(), &state.critique)
            .await
    }

    /// Writing step: task + outline + notes (+ critique on revisions) → draft.
    ///
    /// Advances the revision counter on every entry after the first.
    pub async fn write(&self, state: &ReportState) -> Result<ReportUpdate, AgentError> {
        let revising = !state.is_first_draft();
        info!(
            revision = state.revision_number,
            revising, "writing report draft"
        );

        let mut content = format!(
            "Task:\n{}\n\nOutline:\n{}\n\nResearch notes:\n{}",
            state.task,
            state.plan,
            state.format_notes()
        );
        if revising {
            content.push_str(&format!(
                "\n\nPrevious draft:\n{}\n\nCritique:\n{}",
                state.draft, state.critique
            ));
        }

        let draft = self
            .generation
            .generate(ReportPrompts::writer(), &content)
            .await?;

        let mut update = ReportUpdate::empty().with_draft(draft);
        if revising {
            update = update.with_revision_increment();
        }
        Ok(update)
    }

    /// Review step: draft → critique
    pub async fn review(&self, state: &ReportState) -> Result<ReportUpdate, AgentError> {
        info!(revision = state.revision_number, "reviewing draft");

        let critique = self
            .generation
            .generate(ReportPrompts::reviewer(), &state.draft)
            .await?;

        Ok(ReportUpdate::empty().with_critique(critique))
    }

    /// Decision step, evaluated in this exact order:
    ///
    /// 1. Revision ceiling exceeded → accept, regardless of quality.
    /// 2. Manual override supplied for the run → that label.
    /// 3. Editor verdict "yes" → accept; "no" → another review pass.
    /// 4. Unparseable verdict → fail open into another review pass, with the
    ///    incident recorded in the patch.
    pub async fn decide(
        &self,
        state: &ReportState,
        override_decision: Option<Decision>,
    ) -> Result<(Decision, ReportUpdate), AgentError> {
        if state.ceiling_reached() {
            info!(
                revision = state.revision_number,
                max_revisions = state.max_revisions,
                "revision ceiling reached, accepting report"
            );
            return Ok((Decision::Accepted, ReportUpdate::empty()));
        }

        if let Some(decision) = override_decision {
            info!(decision = decision.as_str(), "applying manual decision override");
            return Ok((decision, ReportUpdate::empty()));
        }

        let content = format!(
            "Critique:\n{}\n\nRevised report:\n{}",
            state.critique, state.draft
        );
        let verdict_text = self
            .generation
            .generate(ReportPrompts::editor(), &content)
            .await?;

        match parse_verdict(&verdict_text) {
            Ok(true) => {
                info!("editor accepted the report");
                Ok((Decision::Accepted, ReportUpdate::empty()))
            }
            Ok(false) => {
                info!("editor requested another revision pass");
                Ok((Decision::ToReview, ReportUpdate::empty()))
            }
            Err(err) => {
                // Fail open: one extra loop beats blocking the run.
                warn!(error = %err, "unparseable editor verdict, routing to review");
                Ok((
                    Decision::ToReview,
                    ReportUpdate::empty().with_error(err.to_string()),
                ))
            }
        }
    }

    async fn run_queries(&self, prompt: &str, subject: &str) -> Result<ReportUpdate, AgentError> {
        let raw = self.generation.generate(prompt, subject).await?;
        let queries = parse_queries(&raw);
        debug!(count = queries.len(), "generated search queries");

        let mut update = ReportUpdate::empty();
        for query in &queries {
            // Sequential on purpose: results for each query land before the
            // next query runs, keeping note order deterministic.
            let notes = self.search.search(query).await?;
            update.new_notes.extend(notes);
        }
        Ok(update)
    }
}

/// Extract up to [`MAX_QUERIES`] search queries from free-text output.
///
/// One query per line; list numbering, bullets, and surrounding quotes are
/// stripped; blank lines are skipped. Order and content are preserved.
pub fn parse_queries(raw: &str) -> Vec<String> {
    raw.lines()
        .map(strip_list_marker)
        .filter(|q| !q.is_empty())
        .take(MAX_QUERIES)
        .collect()
}

/// Remove a leading list marker ("1.", "2)", "-", "*") and surrounding
/// quotes from one line.
///
/// A digit run counts as numbering only when a `.` or `)` follows it, so a
/// query that happens to start with a number ("2024 AI trends") passes
/// through intact.
fn strip_list_marker(line: &str) -> String {
    let mut rest = line.trim();

    let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0 && matches!(rest.as_bytes().get(digits), Some(b'.' | b')')) {
        rest = &rest[digits + 1..];
    }

    rest.trim_start_matches(['-', '*'])
        .trim()
        .trim_matches('"')
        .to_string()
}

/// Parse a yes/no verdict out of free-text editor output.
///
/// The first standalone "yes" or "no" token (case-insensitive, punctuation
/// stripped) decides. Text with neither token is a parse error.
pub fn parse_verdict(raw: &str) -> Result<bool, VerdictParseError> {
    for token in raw.split_whitespace() {
        let token = token
            .trim_matches(|c: char| !c.is_ascii_alphanumeric())
            .to_ascii_lowercase();
        match token.as_str() {
            "yes" => return Ok(true),
            "no" => return Ok(false),
            _ => continue,
        }
    }
    Err(VerdictParseError(raw.to_string()))
}
