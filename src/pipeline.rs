//! CI outcome classification from commit statuses and check runs
//!
//! GitHub has two CI systems:
//! 1. Commit Status API (legacy) - used by external CI services
//! 2. Check Runs API (modern) - used by GitHub Actions
//!
//! Both are consulted. The classification functions are pure; only
//! [`PipelineEvaluator`] talks to the platform.

use crate::platform::PlatformService;
use crate::types::{
    CheckAnnotation, CheckRun, CombinedStatus, PipelineOutcome, PipelineStatus,
    PullRequestCandidate,
};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, warn};

/// Check-run conclusions that do not block a merge
const PASSING_CONCLUSIONS: [&str; 3] = ["success", "neutral", "skipped"];

/// Case-insensitive substring matcher for failures that must not block
///
/// Typical use: CI providers that fail because the account ran out of
/// minutes rather than because the code is broken.
#[derive(Debug, Clone, Default)]
pub struct SoftFailMatcher {
    patterns: Vec<String>,
}

impl SoftFailMatcher {
    /// Build from configured patterns; blank patterns are ignored
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Whether `text` contains any pattern
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.patterns.iter().any(|p| text.contains(p.as_str()))
    }
}

/// A completed check run that did not pass, with everything known about it
#[derive(Debug, Clone)]
pub struct FailedCheckRun {
    /// The run itself
    pub run: CheckRun,
    /// Annotations fetched for the run
    pub annotations: Vec<CheckAnnotation>,
}

impl FailedCheckRun {
    fn is_soft_failure(&self, soft_fail: &SoftFailMatcher) -> bool {
        let output_matches = self.run.output.as_ref().is_some_and(|o| {
            o.title.as_deref().is_some_and(|t| soft_fail.matches(t))
                || o.summary.as_deref().is_some_and(|s| soft_fail.matches(s))
        });
        output_matches
            || self
                .annotations
                .iter()
                .any(|a| soft_fail.matches(&a.message))
    }

    fn describe(&self, out: &mut String) {
        let conclusion = self.run.conclusion.as_deref().unwrap_or("unknown");
        let _ = writeln!(out, "- {}: {conclusion}", self.run.name);
        if let Some(output) = &self.run.output {
            if let Some(title) = output.title.as_deref().filter(|t| !t.is_empty()) {
                let _ = writeln!(out, "  {title}");
            }
            if let Some(summary) = output.summary.as_deref().filter(|s| !s.is_empty()) {
                let _ = writeln!(out, "  {}", summary.trim());
            }
        }
        for annotation in &self.annotations {
            let _ = writeln!(out, "  > {}", annotation.message.trim());
        }
    }
}

/// Classify the legacy combined status.
///
/// Returns `None` when the legacy API has nothing to say (no statuses, or
/// success/neutral) and check runs should decide.
pub fn classify_combined_status(
    combined: &CombinedStatus,
    soft_fail: &SoftFailMatcher,
) -> Option<PipelineStatus> {
    if combined.total_count == 0 || matches!(combined.state.as_str(), "success" | "neutral") {
        return None;
    }

    let failed: Vec<_> = combined
        .statuses
        .iter()
        .filter(|s| matches!(s.state.as_str(), "failure" | "error"))
        .collect();

    if failed.is_empty() {
        return Some(PipelineStatus::new(
            PipelineOutcome::Pending,
            format!("Legacy status is {}", combined.state),
        ));
    }

    let lines: Vec<String> = failed
        .iter()
        .map(|s| format!("- {}: {}", s.context, s.description.as_deref().unwrap_or("")))
        .collect();

    let all_soft = failed.iter().all(|s| {
        soft_fail.matches(&s.context) || s.description.as_deref().is_some_and(|d| soft_fail.matches(d))
    });
    if all_soft {
        return Some(PipelineStatus::new(
            PipelineOutcome::Success,
            format!(
                "Pipeline failed due to billing/limit issues (treated as passing):\n{}",
                lines.join("\n")
            ),
        ));
    }

    Some(PipelineStatus::new(
        PipelineOutcome::Failure,
        format!("Pipeline failed with status:\n{}", lines.join("\n")),
    ))
}

/// Names of check runs that have not completed
pub fn pending_check_runs(runs: &[CheckRun]) -> Vec<&str> {
    runs.iter()
        .filter(|r| r.status != "completed")
        .map(|r| r.name.as_str())
        .collect()
}

/// Whether a completed run's conclusion blocks merging
pub fn is_failing_conclusion(run: &CheckRun) -> bool {
    run.status == "completed"
        && !run
            .conclusion
            .as_deref()
            .is_some_and(|c| PASSING_CONCLUSIONS.contains(&c))
}

/// Classify failed check runs (pure)
pub fn classify_failed_runs(
    failed: &[FailedCheckRun],
    soft_fail: &SoftFailMatcher,
) -> PipelineStatus {
    if failed.is_empty() {
        return PipelineStatus::new(PipelineOutcome::Success, "");
    }

    let (soft, hard): (Vec<&FailedCheckRun>, Vec<&FailedCheckRun>) =
        failed.iter().partition(|f| f.is_soft_failure(soft_fail));

    if hard.is_empty() {
        let mut detail =
            String::from("Pipeline failed due to billing/limit issues (treated as passing):\n");
        for run in soft {
            run.describe(&mut detail);
        }
        return PipelineStatus::new(PipelineOutcome::Success, detail.trim_end());
    }

    let mut detail = String::from("Pipeline failed with check runs:\n");
    for run in hard {
        run.describe(&mut detail);
    }
    PipelineStatus::new(PipelineOutcome::Failure, detail.trim_end())
}

/// Fetches CI data for a PR snapshot and classifies it
pub struct PipelineEvaluator {
    platform: Arc<dyn PlatformService>,
    soft_fail: SoftFailMatcher,
}

impl PipelineEvaluator {
    /// Create an evaluator
    pub fn new(platform: Arc<dyn PlatformService>, soft_fail: SoftFailMatcher) -> Self {
        Self {
            platform,
            soft_fail,
        }
    }

    /// Evaluate the pipeline for the PR's head commit.
    ///
    /// Never fails: platform errors become [`PipelineOutcome::Error`].
    pub async fn evaluate(&self, candidate: &PullRequestCandidate) -> PipelineStatus {
        match self.try_evaluate(candidate).await {
            Ok(status) => {
                if status.outcome == PipelineOutcome::Success && !status.detail.is_empty() {
                    warn!(pr = %candidate.display_id(), detail = %status.detail, "ignoring soft CI failure");
                }
                status
            }
            Err(e) => PipelineStatus::new(PipelineOutcome::Error, e.to_string()),
        }
    }

    async fn try_evaluate(
        &self,
        candidate: &PullRequestCandidate,
    ) -> crate::error::Result<PipelineStatus> {
        if candidate.commit_count == 0 {
            return Ok(PipelineStatus::new(
                PipelineOutcome::NoCommits,
                "PR has no commits",
            ));
        }

        let repo = &candidate.repository;
        let combined = self
            .platform
            .get_combined_status(repo, &candidate.head_sha)
            .await?;
        if let Some(status) = classify_combined_status(&combined, &self.soft_fail) {
            debug!(outcome = ?status.outcome, "legacy status decided pipeline");
            return Ok(status);
        }

        let runs = self
            .platform
            .get_check_runs(repo, &candidate.head_sha)
            .await?;

        let pending = pending_check_runs(&runs);
        if !pending.is_empty() {
            return Ok(PipelineStatus::new(
                PipelineOutcome::Pending,
                format!("Checks pending: {}", pending.join(", ")),
            ));
        }

        let mut failed = Vec::new();
        for run in runs.into_iter().filter(is_failing_conclusion) {
            let annotations = match self.platform.get_annotations(repo, run.id).await {
                Ok(annotations) => annotations,
                Err(e) => {
                    debug!(run = %run.name, error = %e, "could not fetch annotations");
                    Vec::new()
                }
            };
            failed.push(FailedCheckRun { run, annotations });
        }

        Ok(classify_failed_runs(&failed, &self.soft_fail))
    }
}
