//! PR comment bodies and the hidden markers that make them idempotent

use crate::types::PullRequestCandidate;

/// Hidden marker carried by every conflict notification
pub const CONFLICT_MARKER: &str = "<!-- pr-triage:conflicts -->";

/// Hidden marker carried by every pipeline-failure report
pub const PIPELINE_FAILURE_MARKER: &str = "<!-- pr-triage:pipeline-failure -->";

/// Heading used when no generated text is available
pub const PIPELINE_FAILURE_FALLBACK: &str = "## Pipeline Failure Detected\n\n\
    The CI pipeline for this pull request is failing. Please review the \
    details below and push a fix.";

/// Whether any existing comment carries `marker`
pub fn has_marker<'a>(bodies: impl IntoIterator<Item = &'a str>, marker: &str) -> bool {
    bodies.into_iter().any(|body| body.contains(marker))
}

/// Comment asking the author to resolve conflicts by hand
pub fn conflict_comment(candidate: &PullRequestCandidate) -> String {
    format!(
        "### ⚠️ Merge conflicts detected\n\n\
         This pull request has conflicts with `{base}` that could not be resolved \
         automatically. Please merge or rebase `{base}` into `{head}` and resolve them.\n\n\
         {CONFLICT_MARKER}",
        base = candidate.base_ref,
        head = candidate.head_ref,
    )
}

/// Pipeline failure report: the lead text followed by the raw failure details
pub fn pipeline_failure_comment(lead: &str, detail: &str) -> String {
    format!(
        "{lead}\n\n\
         <details>\n<summary>Failure details</summary>\n\n```\n{detail}\n```\n</details>\n\n\
         {PIPELINE_FAILURE_MARKER}",
        lead = lead.trim(),
        detail = detail.trim(),
    )
}

/// Confirmation posted after a successful merge
pub fn merged_comment(sha: Option<&str>) -> String {
    sha.map_or_else(
        || "✅ Merged automatically: all checks passed.".to_string(),
        |sha| format!("✅ Merged automatically as {sha}: all checks passed."),
    )
}
