//! Merge execution and author notifications (effectful)
//!
//! Every mutation of a PR goes through here. Notifications are idempotent:
//! before posting, existing comments are scanned for the hidden marker the
//! same notification would carry.

use super::comments::{
    CONFLICT_MARKER, PIPELINE_FAILURE_FALLBACK, PIPELINE_FAILURE_MARKER, conflict_comment,
    has_marker, merged_comment, pipeline_failure_comment,
};
use crate::ai::AiAssistant;
use crate::platform::PlatformService;
use crate::types::{
    MergeMethod, PipelineStatus, ProcessingOutcome, PullRequestCandidate, SkipReason,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Performs merges and posts PR comments
pub struct MergeExecutor {
    platform: Arc<dyn PlatformService>,
    ai: Arc<dyn AiAssistant>,
    method: MergeMethod,
    label: String,
}

impl MergeExecutor {
    /// Create an executor
    pub fn new(
        platform: Arc<dyn PlatformService>,
        ai: Arc<dyn AiAssistant>,
        method: MergeMethod,
        label: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            ai,
            method,
            label: label.into(),
        }
    }

    /// Merge the PR.
    ///
    /// The label and the confirmation comment are best-effort; only the
    /// merge call decides the outcome.
    pub async fn merge(&self, candidate: &PullRequestCandidate) -> ProcessingOutcome {
        let repo = &candidate.repository;
        let result = match self
            .platform
            .merge_pr(repo, candidate.number, self.method)
            .await
        {
            Ok(result) if result.merged => result,
            Ok(result) => {
                let message = result
                    .message
                    .unwrap_or_else(|| "merge was not performed".to_string());
                warn!(%message, "merge rejected");
                return ProcessingOutcome::MergeFailed(message);
            }
            Err(e) => {
                warn!(error = %e, "merge failed");
                return ProcessingOutcome::MergeFailed(e.to_string());
            }
        };
        info!(sha = result.sha.as_deref().unwrap_or("(no sha)"), "merged");

        if !self.label.is_empty()
            && let Err(e) = self
                .platform
                .add_label(repo, candidate.number, &self.label)
                .await
        {
            warn!(label = %self.label, error = %e, "could not label merged PR");
        }

        let body = merged_comment(result.sha.as_deref());
        if let Err(e) = self
            .platform
            .create_pr_comment(repo, candidate.number, &body)
            .await
        {
            warn!(error = %e, "could not post merge confirmation");
        }

        ProcessingOutcome::Merged
    }

    /// Ask the author to resolve conflicts, unless already asked
    pub async fn notify_conflicts(&self, candidate: &PullRequestCandidate) -> ProcessingOutcome {
        if self.already_posted(candidate, CONFLICT_MARKER).await {
            info!("conflict notification already present");
            return ProcessingOutcome::ConflictsDetectedNotified;
        }

        match self
            .platform
            .create_pr_comment(
                &candidate.repository,
                candidate.number,
                &conflict_comment(candidate),
            )
            .await
        {
            Ok(()) => {
                info!("posted conflict notification");
                ProcessingOutcome::ConflictsDetectedNotified
            }
            Err(e) => {
                warn!(error = %e, "could not post conflict notification");
                ProcessingOutcome::Skipped(SkipReason::ConflictResolutionFailed)
            }
        }
    }

    /// Report a failing pipeline to the author, unless already reported
    pub async fn report_pipeline_failure(
        &self,
        candidate: &PullRequestCandidate,
        status: &PipelineStatus,
    ) -> ProcessingOutcome {
        let reported = ProcessingOutcome::PipelineFailureReported(status.detail.clone());
        if self
            .already_posted(candidate, PIPELINE_FAILURE_MARKER)
            .await
        {
            info!("pipeline failure already reported");
            return reported;
        }

        let lead = match self.ai.generate_comment(&status.detail).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => PIPELINE_FAILURE_FALLBACK.to_string(),
            Err(e) => {
                warn!(error = %e, "comment generation failed, using template");
                PIPELINE_FAILURE_FALLBACK.to_string()
            }
        };

        let body = pipeline_failure_comment(&lead, &status.detail);
        match self
            .platform
            .create_pr_comment(&candidate.repository, candidate.number, &body)
            .await
        {
            Ok(()) => {
                info!("posted pipeline failure report");
                reported
            }
            Err(e) => {
                warn!(error = %e, "could not post pipeline failure report");
                ProcessingOutcome::Skipped(SkipReason::Error(e.to_string()))
            }
        }
    }

    /// Listing failures count as "not posted" so the author still hears about it
    async fn already_posted(&self, candidate: &PullRequestCandidate, marker: &str) -> bool {
        match self
            .platform
            .list_pr_comments(&candidate.repository, candidate.number)
            .await
        {
            Ok(comments) => has_marker(comments.iter().map(|c| c.body.as_str()), marker),
            Err(e) => {
                warn!(error = %e, "could not list existing comments");
                false
            }
        }
    }
}
