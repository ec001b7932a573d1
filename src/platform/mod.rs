//! Platform services for GitHub
//!
//! Everything the triage engine needs from the hosting platform goes
//! through [`PlatformService`], so the engine can be driven by a mock in
//! tests and by [`GitHubService`] in production.

mod factory;
mod github;
mod reference;

pub use factory::create_platform_service;
pub use github::GitHubService;
pub use reference::{
    PrReference, authenticated_clone_url, parse_pr_reference, redact_credentials, redact_secret,
};

use crate::error::Result;
use crate::types::{
    CheckAnnotation, CheckRun, CombinedStatus, MergeMethod, MergeResult, PrComment, PrListing,
    PullRequestCandidate, RepoRef,
};
use async_trait::async_trait;

/// Platform service trait for PR operations
///
/// Reads are snapshots: callers capture a [`PullRequestCandidate`] once and
/// make every decision from it.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Search open PRs matching a GitHub search query
    async fn search_open_prs(&self, query: &str) -> Result<Vec<PrListing>>;

    /// Fetch the full snapshot for one PR
    async fn get_candidate(&self, repo: &RepoRef, number: u64) -> Result<PullRequestCandidate>;

    /// Legacy combined commit status for a commit
    async fn get_combined_status(&self, repo: &RepoRef, sha: &str) -> Result<CombinedStatus>;

    /// Check runs for a commit
    async fn get_check_runs(&self, repo: &RepoRef, sha: &str) -> Result<Vec<CheckRun>>;

    /// Annotations for a single check run
    async fn get_annotations(&self, repo: &RepoRef, check_run_id: u64)
    -> Result<Vec<CheckAnnotation>>;

    /// Merge a PR with the specified method
    async fn merge_pr(&self, repo: &RepoRef, number: u64, method: MergeMethod)
    -> Result<MergeResult>;

    /// Attach a label to a PR
    async fn add_label(&self, repo: &RepoRef, number: u64, label: &str) -> Result<()>;

    /// List all issue comments on a PR
    async fn list_pr_comments(&self, repo: &RepoRef, number: u64) -> Result<Vec<PrComment>>;

    /// Create an issue comment on a PR
    async fn create_pr_comment(&self, repo: &RepoRef, number: u64, body: &str) -> Result<()>;
}
