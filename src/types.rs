//! Core types for pr-triage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A repository identified by `owner/name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoRef {
    /// Create a repository reference
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name`
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A search hit for an open PR, before its details are fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrListing {
    /// Repository the PR targets
    pub repository: RepoRef,
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Web URL for the PR
    pub html_url: String,
}

/// GitHub's (possibly still computing) mergeability flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeableState {
    /// GitHub has not finished computing mergeability
    Unknown,
    /// Head merges cleanly into base
    Mergeable,
    /// Head conflicts with base
    Conflicted,
}

impl From<Option<bool>> for MergeableState {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Unknown,
            Some(true) => Self::Mergeable,
            Some(false) => Self::Conflicted,
        }
    }
}

/// Immutable snapshot of a PR, taken once per processing attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestCandidate {
    /// Base repository
    pub repository: RepoRef,
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Web URL for the PR
    pub html_url: String,
    /// Login of the PR author
    pub author: String,
    /// Head branch name
    pub head_ref: String,
    /// Base branch name
    pub base_ref: String,
    /// SHA of the head commit
    pub head_sha: String,
    /// Head repository ID (`None` when the fork was deleted)
    pub head_repo_id: Option<u64>,
    /// Base repository ID
    pub base_repo_id: u64,
    /// Clone URL of the head repository
    pub head_clone_url: Option<String>,
    /// Clone URL of the base repository
    pub base_clone_url: String,
    /// Mergeability as reported at snapshot time
    pub mergeable_state: MergeableState,
    /// Whether the PR is a draft
    pub is_draft: bool,
    /// Number of commits on the PR
    pub commit_count: u64,
    /// When the PR was opened
    pub created_at: DateTime<Utc>,
}

impl PullRequestCandidate {
    /// Whether the head lives in a different repository than the base
    pub fn is_fork(&self) -> bool {
        self.head_repo_id != Some(self.base_repo_id)
    }

    /// Short identifier for logs, e.g. `owner/repo#12`
    pub fn display_id(&self) -> String {
        format!("{}#{}", self.repository, self.number)
    }
}

/// A single legacy commit status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStatus {
    /// `success`, `pending`, `failure` or `error`
    pub state: String,
    /// Status context, e.g. `ci/build`
    pub context: String,
    /// Human-readable description
    pub description: Option<String>,
}

/// The legacy combined status for a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedStatus {
    /// Aggregate state
    pub state: String,
    /// Number of statuses that contributed
    pub total_count: u64,
    /// The individual statuses
    pub statuses: Vec<CommitStatus>,
}

/// Title and summary posted by a check run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckRunOutput {
    /// Output title
    pub title: Option<String>,
    /// Output summary
    pub summary: Option<String>,
}

/// A modern CI check run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check run ID (used to fetch annotations)
    pub id: u64,
    /// Check run name
    pub name: String,
    /// `queued`, `in_progress` or `completed`
    pub status: String,
    /// Conclusion once completed
    pub conclusion: Option<String>,
    /// Structured output, if any
    pub output: Option<CheckRunOutput>,
}

/// An annotation attached to a check run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckAnnotation {
    /// Annotation message
    pub message: String,
}

/// Classified CI outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineOutcome {
    /// Everything passed (or only soft failures)
    Success,
    /// Still running
    Pending,
    /// At least one blocking failure
    Failure,
    /// The status could not be determined
    Error,
    /// The PR has no commits
    NoCommits,
}

/// Derived pipeline status with human-readable detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStatus {
    /// Classified outcome
    pub outcome: PipelineOutcome,
    /// Details (failing contexts, pending runs, error text)
    pub detail: String,
}

impl PipelineStatus {
    /// Build a status
    pub fn new(outcome: PipelineOutcome, detail: impl Into<String>) -> Self {
        Self {
            outcome,
            detail: detail.into(),
        }
    }

    /// Whether the pipeline is green
    pub fn is_success(&self) -> bool {
        self.outcome == PipelineOutcome::Success
    }
}

/// A comment on a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrComment {
    /// Comment ID
    pub id: u64,
    /// Comment body text
    pub body: String,
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash all commits into one
    Squash,
    /// Rebase commits onto base branch
    Rebase,
}

impl fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}

/// Why a PR was left alone this run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SkipReason {
    /// Author is not on the trusted list
    UnauthorizedAuthor,
    /// PR is younger than the minimum age
    PrTooYoung,
    /// GitHub has not computed mergeability yet
    MergeabilityUnknown,
    /// CI is still running
    PipelinePending,
    /// Conflicts could not be resolved and the fallback notification failed
    ConflictResolutionFailed,
    /// Something went wrong while processing the PR
    Error(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnauthorizedAuthor => write!(f, "unauthorized_author"),
            Self::PrTooYoung => write!(f, "pr_too_young"),
            Self::MergeabilityUnknown => write!(f, "mergeability_unknown"),
            Self::PipelinePending => write!(f, "pipeline_pending"),
            Self::ConflictResolutionFailed => write!(f, "conflict_resolution_failed"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Terminal outcome for one PR in one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "detail", rename_all = "snake_case")]
pub enum ProcessingOutcome {
    /// PR was merged
    Merged,
    /// Conflicts were resolved and pushed
    ConflictsResolved,
    /// Conflicts remain and the author has been asked to fix them
    ConflictsDetectedNotified,
    /// CI failed and the author has been asked to fix it
    PipelineFailureReported(String),
    /// The merge call failed
    MergeFailed(String),
    /// Nothing was done
    Skipped(SkipReason),
}

impl ProcessingOutcome {
    /// Short machine-friendly label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Merged => "merged",
            Self::ConflictsResolved => "conflicts_resolved",
            Self::ConflictsDetectedNotified => "conflicts_detected",
            Self::PipelineFailureReported(_) => "pipeline_failure",
            Self::MergeFailed(_) => "merge_failed",
            Self::Skipped(_) => "skipped",
        }
    }

    /// Human-readable reason, if the outcome carries one
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::PipelineFailureReported(detail) | Self::MergeFailed(detail) => {
                Some(detail.clone())
            }
            Self::Skipped(reason) => Some(reason.to_string()),
            Self::Merged | Self::ConflictsResolved | Self::ConflictsDetectedNotified => None,
        }
    }
}

impl fmt::Display for ProcessingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{} ({reason})", self.label()),
            None => write!(f, "{}", self.label()),
        }
    }
}
