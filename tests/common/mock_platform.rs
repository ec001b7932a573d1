//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use pr_triage::error::{Error, Result};
use pr_triage::platform::PlatformService;
use pr_triage::types::{
    CheckAnnotation, CheckRun, CombinedStatus, MergeMethod, MergeResult, PrComment, PrListing,
    PullRequestCandidate, RepoRef,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_pr_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub method: MergeMethod,
}

/// Call record for `add_label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLabelCall {
    pub pr_number: u64,
    pub label: String,
}

/// Simple mock platform service for testing
///
/// This manually implements `PlatformService` rather than using mockall,
/// so call tracking and error injection stay explicit.
///
/// Features:
/// - Candidates, statuses and check runs configured per PR / per commit
/// - Posted comments are stored, so a second notification sees the first
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    next_comment_id: AtomicU64,
    listings: Mutex<Vec<PrListing>>,
    candidates: Mutex<HashMap<u64, PullRequestCandidate>>,
    combined_statuses: Mutex<HashMap<String, CombinedStatus>>,
    check_runs: Mutex<HashMap<String, Vec<CheckRun>>>,
    annotations: Mutex<HashMap<u64, Vec<CheckAnnotation>>>,
    comments: Mutex<HashMap<u64, Vec<PrComment>>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    // Call tracking
    search_calls: Mutex<Vec<String>>,
    get_candidate_calls: Mutex<Vec<u64>>,
    combined_status_calls: Mutex<Vec<String>>,
    check_runs_calls: Mutex<Vec<String>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    add_label_calls: Mutex<Vec<AddLabelCall>>,
    create_comment_calls: Mutex<Vec<CreateCommentCall>>,
    list_comments_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_search: Mutex<Option<String>>,
    error_on_get_candidate: Mutex<HashSet<u64>>,
    error_on_combined_status: Mutex<HashMap<String, String>>,
    error_on_annotations: Mutex<Option<String>>,
    error_on_merge_pr: Mutex<Option<String>>,
    error_on_add_label: Mutex<Option<String>>,
    error_on_create_comment: Mutex<Option<String>>,
    error_on_list_comments: Mutex<Option<String>>,
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatformService {
    /// Create an empty mock
    pub fn new() -> Self {
        Self {
            next_comment_id: AtomicU64::new(1),
            listings: Mutex::new(Vec::new()),
            candidates: Mutex::new(HashMap::new()),
            combined_statuses: Mutex::new(HashMap::new()),
            check_runs: Mutex::new(HashMap::new()),
            annotations: Mutex::new(HashMap::new()),
            comments: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            search_calls: Mutex::new(Vec::new()),
            get_candidate_calls: Mutex::new(Vec::new()),
            combined_status_calls: Mutex::new(Vec::new()),
            check_runs_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            add_label_calls: Mutex::new(Vec::new()),
            create_comment_calls: Mutex::new(Vec::new()),
            list_comments_calls: Mutex::new(Vec::new()),
            error_on_search: Mutex::new(None),
            error_on_get_candidate: Mutex::new(HashSet::new()),
            error_on_combined_status: Mutex::new(HashMap::new()),
            error_on_annotations: Mutex::new(None),
            error_on_merge_pr: Mutex::new(None),
            error_on_add_label: Mutex::new(None),
            error_on_create_comment: Mutex::new(None),
            error_on_list_comments: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make `search_open_prs` return an error
    pub fn fail_search(&self, msg: &str) {
        *self.error_on_search.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `get_candidate` fail for one PR
    pub fn fail_get_candidate(&self, pr_number: u64) {
        self.error_on_get_candidate.lock().unwrap().insert(pr_number);
    }

    /// Make `get_combined_status` fail for one commit
    pub fn fail_combined_status(&self, sha: &str, msg: &str) {
        self.error_on_combined_status
            .lock()
            .unwrap()
            .insert(sha.to_string(), msg.to_string());
    }

    /// Make `get_annotations` return an error
    pub fn fail_annotations(&self, msg: &str) {
        *self.error_on_annotations.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_label` return an error
    pub fn fail_add_label(&self, msg: &str) {
        *self.error_on_add_label.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr_comment` return an error
    pub fn fail_create_comment(&self, msg: &str) {
        *self.error_on_create_comment.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_pr_comments` return an error
    pub fn fail_list_comments(&self, msg: &str) {
        *self.error_on_list_comments.lock().unwrap() = Some(msg.to_string());
    }

    // === Response setup ===

    /// Register a PR: it is returned by search and by `get_candidate`
    pub fn add_candidate(&self, candidate: PullRequestCandidate) {
        self.listings.lock().unwrap().push(PrListing {
            repository: candidate.repository.clone(),
            number: candidate.number,
            title: candidate.title.clone(),
            html_url: candidate.html_url.clone(),
        });
        self.candidates
            .lock()
            .unwrap()
            .insert(candidate.number, candidate);
    }

    /// Set the legacy combined status for a commit
    pub fn set_combined_status(&self, sha: &str, status: CombinedStatus) {
        self.combined_statuses
            .lock()
            .unwrap()
            .insert(sha.to_string(), status);
    }

    /// Set check runs for a commit
    pub fn set_check_runs(&self, sha: &str, runs: Vec<CheckRun>) {
        self.check_runs.lock().unwrap().insert(sha.to_string(), runs);
    }

    /// Set annotations for a check run
    pub fn set_annotations(&self, check_run_id: u64, messages: &[&str]) {
        self.annotations.lock().unwrap().insert(
            check_run_id,
            messages
                .iter()
                .map(|m| CheckAnnotation {
                    message: (*m).to_string(),
                })
                .collect(),
        );
    }

    /// Seed an existing comment on a PR
    pub fn add_existing_comment(&self, pr_number: u64, body: &str) {
        let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst);
        self.comments
            .lock()
            .unwrap()
            .entry(pr_number)
            .or_default()
            .push(PrComment {
                id,
                body: body.to_string(),
            });
    }

    /// Set the response for `merge_pr` for a specific PR
    pub fn set_merge_response(&self, pr_number: u64, result: MergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(pr_number, result);
    }

    // === Call inspection ===

    pub fn get_search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn get_candidate_calls(&self) -> Vec<u64> {
        self.get_candidate_calls.lock().unwrap().clone()
    }

    pub fn get_combined_status_calls(&self) -> Vec<String> {
        self.combined_status_calls.lock().unwrap().clone()
    }

    pub fn get_check_runs_calls(&self) -> Vec<String> {
        self.check_runs_calls.lock().unwrap().clone()
    }

    pub fn get_merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    pub fn get_add_label_calls(&self) -> Vec<AddLabelCall> {
        self.add_label_calls.lock().unwrap().clone()
    }

    pub fn get_create_comment_calls(&self) -> Vec<CreateCommentCall> {
        self.create_comment_calls.lock().unwrap().clone()
    }

    pub fn get_list_comments_calls(&self) -> Vec<u64> {
        self.list_comments_calls.lock().unwrap().clone()
    }

    /// Number of calls that change state on GitHub
    pub fn mutation_count(&self) -> usize {
        self.merge_pr_calls.lock().unwrap().len()
            + self.add_label_calls.lock().unwrap().len()
            + self.create_comment_calls.lock().unwrap().len()
    }

    pub fn assert_merge_called(&self, pr_number: u64) {
        let calls = self.get_merge_pr_calls();
        assert!(
            calls.iter().any(|c| c.pr_number == pr_number),
            "Expected merge_pr call for PR #{pr_number}, got: {calls:?}"
        );
    }

    pub fn assert_merge_not_called(&self, pr_number: u64) {
        let calls = self.get_merge_pr_calls();
        assert!(
            !calls.iter().any(|c| c.pr_number == pr_number),
            "Expected no merge_pr call for PR #{pr_number}, got: {calls:?}"
        );
    }

    pub fn assert_no_mutations(&self) {
        assert_eq!(
            self.mutation_count(),
            0,
            "Expected no mutations, got merges {:?}, labels {:?}, comments {:?}",
            self.get_merge_pr_calls(),
            self.get_add_label_calls(),
            self.get_create_comment_calls()
        );
    }

    pub fn comment_count(&self, pr_number: u64) -> usize {
        self.get_create_comment_calls()
            .iter()
            .filter(|c| c.pr_number == pr_number)
            .count()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn search_open_prs(&self, query: &str) -> Result<Vec<PrListing>> {
        self.search_calls.lock().unwrap().push(query.to_string());
        if let Some(msg) = self.error_on_search.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(self.listings.lock().unwrap().clone())
    }

    async fn get_candidate(&self, _repo: &RepoRef, number: u64) -> Result<PullRequestCandidate> {
        self.get_candidate_calls.lock().unwrap().push(number);
        if self.error_on_get_candidate.lock().unwrap().contains(&number) {
            return Err(Error::GitHubApi(format!("PR #{number} could not be loaded")));
        }
        self.candidates
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or_else(|| Error::GitHubApi(format!("PR #{number} not found")))
    }

    async fn get_combined_status(&self, _repo: &RepoRef, sha: &str) -> Result<CombinedStatus> {
        self.combined_status_calls
            .lock()
            .unwrap()
            .push(sha.to_string());
        if let Some(msg) = self.error_on_combined_status.lock().unwrap().get(sha) {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(self
            .combined_statuses
            .lock()
            .unwrap()
            .get(sha)
            .cloned()
            .unwrap_or(CombinedStatus {
                state: "pending".to_string(),
                total_count: 0,
                statuses: vec![],
            }))
    }

    async fn get_check_runs(&self, _repo: &RepoRef, sha: &str) -> Result<Vec<CheckRun>> {
        self.check_runs_calls.lock().unwrap().push(sha.to_string());
        Ok(self
            .check_runs
            .lock()
            .unwrap()
            .get(sha)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_annotations(
        &self,
        _repo: &RepoRef,
        check_run_id: u64,
    ) -> Result<Vec<CheckAnnotation>> {
        if let Some(msg) = self.error_on_annotations.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(self
            .annotations
            .lock()
            .unwrap()
            .get(&check_run_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn merge_pr(
        &self,
        _repo: &RepoRef,
        number: u64,
        method: MergeMethod,
    ) -> Result<MergeResult> {
        self.merge_pr_calls.lock().unwrap().push(MergePrCall {
            pr_number: number,
            method,
        });
        if let Some(msg) = self.error_on_merge_pr.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(self
            .merge_responses
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .unwrap_or(MergeResult {
                merged: true,
                sha: Some(format!("merge{number}")),
                message: None,
            }))
    }

    async fn add_label(&self, _repo: &RepoRef, number: u64, label: &str) -> Result<()> {
        self.add_label_calls.lock().unwrap().push(AddLabelCall {
            pr_number: number,
            label: label.to_string(),
        });
        if let Some(msg) = self.error_on_add_label.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(())
    }

    async fn list_pr_comments(&self, _repo: &RepoRef, number: u64) -> Result<Vec<PrComment>> {
        self.list_comments_calls.lock().unwrap().push(number);
        if let Some(msg) = self.error_on_list_comments.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(self
            .comments
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_pr_comment(&self, _repo: &RepoRef, number: u64, body: &str) -> Result<()> {
        self.create_comment_calls
            .lock()
            .unwrap()
            .push(CreateCommentCall {
                pr_number: number,
                body: body.to_string(),
            });
        if let Some(msg) = self.error_on_create_comment.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        self.add_existing_comment(number, body);
        Ok(())
    }
}
