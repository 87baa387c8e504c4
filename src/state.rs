//! Report workflow state definition
//!
//! A single `ReportState` record flows through every node of the
//! plan → research → write → review → revise loop. Nodes never mutate it in
//! place: each one returns a `ReportUpdate` patch that `apply_update` folds
//! into a fresh state, keeping every transition auditable.

use serde::{Deserialize, Serialize};

/// Tri-state outcome of a report run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Outcome {
    /// No terminal branch has been taken yet
    #[default]
    Pending,
    /// The report was accepted (editor verdict or revision ceiling)
    Accepted,
    /// The report was rejected (manual override path)
    Rejected,
}

impl Outcome {
    /// Check whether a terminal branch has been taken
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A retrieved reference snippet with its source identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceNote {
    /// Snippet text returned by the search collaborator
    pub content: String,
    /// Where the snippet came from (URL or other identifier)
    pub source: String,
}

impl ReferenceNote {
    /// Create a new reference note
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
        }
    }
}

/// The complete report workflow state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReportState {
    /// User-supplied topic description, immutable after creation
    pub task: String,

    /// Current outline text, produced by the planning step
    pub plan: String,

    /// Current report text, overwritten by each writing pass
    pub draft: String,

    /// Latest reviewer feedback
    pub critique: String,

    /// Retrieved reference snippets, append-only
    pub research_notes: Vec<ReferenceNote>,

    /// Writing-pass counter, starts at 1 and never decreases
    pub revision_number: usize,

    /// Revision ceiling fixed at task start
    pub max_revisions: usize,

    /// Terminal outcome of the run
    pub outcome: Outcome,

    /// Non-fatal incidents recorded during the run (fail-open verdicts)
    pub errors: Vec<String>,
}

impl ReportState {
    /// Create the initial state for a task
    pub fn new(task: impl Into<String>, max_revisions: usize) -> Self {
        Self {
            task: task.into(),
            revision_number: 1,
            max_revisions,
            ..Default::default()
        }
    }

    /// Check whether the revision ceiling forces acceptance
    pub fn ceiling_reached(&self) -> bool {
        self.revision_number > self.max_revisions
    }

    /// Check whether the writing step has run yet
    pub fn is_first_draft(&self) -> bool {
        self.draft.is_empty()
    }

    /// Format the accumulated notes as a numbered reference list
    pub fn format_notes(&self) -> String {
        self.research_notes
            .iter()
            .enumerate()
            .map(|(i, n)| format!("[{}] {} ({})", i + 1, n.content, n.source))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Fold a patch into this state, returning the successor state.
    ///
    /// Notes and errors only accumulate; scalar fields are replaced only when
    /// the patch carries a value for them.
    pub fn apply_update(&self, update: ReportUpdate) -> Self {
        let mut next = self.clone();

        if let Some(plan) = update.plan {
            next.plan = plan;
        }
        if let Some(draft) = update.draft {
            next.draft = draft;
        }
        if let Some(critique) = update.critique {
            next.critique = critique;
        }
        next.research_notes.extend(update.new_notes);
        next.revision_number += update.revision_increment;
        if let Some(outcome) = update.outcome {
            next.outcome = outcome;
        }
        next.errors.extend(update.errors);

        next
    }
}

/// Patch produced by a single node execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportUpdate {
    /// Replacement outline, if the node produced one
    pub plan: Option<String>,

    /// Replacement draft, if the node produced one
    pub draft: Option<String>,

    /// Replacement critique, if the node produced one
    pub critique: Option<String>,

    /// Notes to append
    pub new_notes: Vec<ReferenceNote>,

    /// How much to advance the revision counter (0 or 1)
    pub revision_increment: usize,

    /// Terminal outcome, set only by the accept/reject nodes
    pub outcome: Option<Outcome>,

    /// Non-fatal incidents to record
    pub errors: Vec<String>,
}

impl ReportUpdate {
    /// An update that changes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check whether the update changes anything
    pub fn is_empty(&self) -> bool {
        self.plan.is_none()
            && self.draft.is_none()
            && self.critique.is_none()
            && self.new_notes.is_empty()
            && self.revision_increment == 0
            && self.outcome.is_none()
            && self.errors.is_empty()
    }

    /// Set the outline
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    /// Set the draft
    pub fn with_draft(mut self, draft: impl Into<String>) -> Self {
        self.draft = Some(draft.into());
        self
    }

    /// Set the critique
    pub fn with_critique(mut self, critique: impl Into<String>) -> Self {
        self.critique = Some(critique.into());
        self
    }

    /// Append notes
    pub fn with_notes(mut self, notes: Vec<ReferenceNote>) -> Self {
        self.new_notes.extend(notes);
        self
    }

    /// Advance the revision counter by one
    pub fn with_revision_increment(mut self) -> Self {
        self.revision_increment = 1;
        self
    }

    /// Set the terminal outcome
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Record a non-fatal incident
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = ReportState::new("quantum annealing basics", 2);

        assert_eq!(state.task, "quantum annealing basics");
        assert_eq!(state.revision_number, 1);
        assert_eq!(state.max_revisions, 2);
        assert_eq!(state.outcome, Outcome::Pending);
        assert!(state.is_first_draft());
        assert!(state.research_notes.is_empty());
    }

    #[test]
    fn test_ceiling_reached() {
        let mut state = ReportState::new("t", 1);
        assert!(!state.ceiling_reached());

        state.revision_number = 2;
        assert!(state.ceiling_reached());
    }

    #[test]
    fn test_ceiling_zero_reached_immediately() {
        let state = ReportState::new("t", 0);
        assert!(state.ceiling_reached());
    }

    #[test]
    fn test_apply_update_replaces_scalars() {
        let state = ReportState::new("t", 1);

        let next = state.apply_update(
            ReportUpdate::empty()
                .with_plan("outline")
                .with_draft("draft v1")
                .with_critique("needs citations"),
        );

        assert_eq!(next.plan, "outline");
        assert_eq!(next.draft, "draft v1");
        assert_eq!(next.critique, "needs citations");
        // Untouched fields survive
        assert_eq!(next.task, "t");
        assert_eq!(next.revision_number, 1);
    }

    #[test]
    fn test_apply_update_appends_notes() {
        let state = ReportState::new("t", 1).apply_update(
            ReportUpdate::empty().with_notes(vec![ReferenceNote::new("a", "https://a.com")]),
        );

        let next = state.apply_update(
            ReportUpdate::empty().with_notes(vec![ReferenceNote::new("b", "https://b.com")]),
        );

        assert_eq!(next.research_notes.len(), 2);
        assert_eq!(next.research_notes[0].content, "a");
        assert_eq!(next.research_notes[1].content, "b");
    }

    #[test]
    fn test_apply_update_increments_revision() {
        let state = ReportState::new("t", 3);
        let next = state.apply_update(ReportUpdate::empty().with_revision_increment());
        assert_eq!(next.revision_number, 2);

        // Empty patch leaves the counter alone
        let next = next.apply_update(ReportUpdate::empty());
        assert_eq!(next.revision_number, 2);
    }

    #[test]
    fn test_apply_update_does_not_mutate_original() {
        let state = ReportState::new("t", 1);
        let _ = state.apply_update(ReportUpdate::empty().with_draft("draft"));
        assert!(state.draft.is_empty());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ReportUpdate::empty().is_empty());
        assert!(!ReportUpdate::empty().with_plan("p").is_empty());
        assert!(!ReportUpdate::empty().with_revision_increment().is_empty());
        assert!(!ReportUpdate::empty().with_error("e").is_empty());
    }

    #[test]
    fn test_outcome_decided() {
        assert!(!Outcome::Pending.is_decided());
        assert!(Outcome::Accepted.is_decided());
        assert!(Outcome::Rejected.is_decided());
    }

    #[test]
    fn test_format_notes() {
        let state = ReportState::new("t", 1).apply_update(ReportUpdate::empty().with_notes(vec![
            ReferenceNote::new("First snippet", "https://a.com"),
            ReferenceNote::new("Second snippet", "https://b.com"),
        ]));

        let formatted = state.format_notes();
        assert!(formatted.contains("[1] First snippet (https://a.com)"));
        assert!(formatted.contains("[2] Second snippet (https://b.com)"));
    }
}
