//! Prompt templates for the report workflow
//!
//! One template per workflow step. Pure data apart from the dated header on
//! the planner prompt; all dynamic content is assembled by the node
//! functions.

use chrono::Utc;

/// Prompt templates for the report workflow steps
pub struct ReportPrompts;

impl ReportPrompts {
    /// Get the current date formatted for prompts
    fn current_date() -> String {
        Utc::now().format("%Y-%m-%d").to_string()
    }

    /// Planning step: produce a high-level outline for the report
    pub fn planner() -> String {
        format!(
            "For context, today's date is {date}.\n\n\
             You are an expert writer tasked with creating a high-level outline for a research \
             report. Write such an outline for the user-provided topic. Include relevant notes \
             or instructions for each section.",
            date = Self::current_date()
        )
    }

    /// Writing step: produce or revise the report draft
    pub fn writer() -> &'static str {
        "You are a professional researcher assigned to write concise, informative, and \
         well-referenced mini-reports on a user's chosen subject. Be sure to cite your \
         references.\n\n\
         Generate the best report possible based on the user's request and the initial \
         outline. If the user provides critique, respond with a revised version of your \
         previous attempts."
    }

    /// Review step: critique the current draft
    pub fn reviewer() -> &'static str {
        "You are a professional researcher reviewing an article written by a colleague. \
         Generate critiques and recommendations for the user's report. Provide detailed \
         suggestions, including requests for length, content, style, and quality of \
         references. Pay attention to the references as well. Are they correctly cited?"
    }

    /// Plan-research step: generate search queries from the outline
    pub fn plan_queries() -> &'static str {
        "You are a researcher tasked with generating information that can be used when \
         writing the following report. Create a list of search queries that will gather \
         relevant information. Generate a maximum of 5 queries, one per line."
    }

    /// Revision-research step: generate search queries from the critique
    pub fn critique_queries() -> &'static str {
        "You are a researcher responsible for providing information that can be used when \
         making any requested revisions (as outlined below). Generate a list of search \
         queries that will gather relevant information. Generate a maximum of 5 queries, \
         one per line."
    }

    /// Decision step: judge whether the draft satisfies the critique
    pub fn editor() -> &'static str {
        "You are a researcher tasked with deciding whether a report has been sufficiently \
         revised to satisfy a critique. You will receive the critique and the revised \
         report. Read both carefully and indicate 'yes' or 'no'.\n\n\
         Use caution when saying 'no'. You are an expert in this process, and while there \
         are always ways to improve an article, it is important to conclude the revision \
         process at some point and declare it good enough for publication. Read the \
         reviewer's comments carefully and make a critical decision about whether acting \
         on them would result in a meaningful improvement to the text.\n\n\
         If you say 'yes', the report will be labeled as finalized and published (to the \
         delight of the author). If 'no', the report will be sent for another round of \
         review."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_carries_date() {
        let prompt = ReportPrompts::planner();
        assert!(prompt.contains("today's date is"));
        assert!(prompt.contains("outline"));
    }

    #[test]
    fn test_templates_not_empty() {
        assert!(!ReportPrompts::writer().is_empty());
        assert!(!ReportPrompts::reviewer().is_empty());
        assert!(!ReportPrompts::plan_queries().is_empty());
        assert!(!ReportPrompts::critique_queries().is_empty());
        assert!(!ReportPrompts::editor().is_empty());
    }

    #[test]
    fn test_query_prompts_bound_count() {
        assert!(ReportPrompts::plan_queries().contains("maximum of 5"));
        assert!(ReportPrompts::critique_queries().contains("maximum of 5"));
    }

    #[test]
    fn test_editor_asks_for_binary_verdict() {
        let prompt = ReportPrompts::editor();
        assert!(prompt.contains("'yes' or 'no'"));
    }
}
