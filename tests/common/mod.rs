//! Shared fixtures for pr-triage tests

#![allow(dead_code)]

pub mod mock_ai;
pub mod mock_git;
pub mod mock_platform;

pub use mock_ai::MockAiAssistant;
pub use mock_git::MockGitRunner;
pub use mock_platform::MockPlatformService;

use chrono::{DateTime, Duration, TimeZone, Utc};
use pr_triage::config::BotIdentity;
use pr_triage::conflict::{AutonomousResolver, ConflictResolutionStrategy, NotifyOnly};
use pr_triage::eligibility::TrustedAuthorPolicy;
use pr_triage::engine::DecisionEngine;
use pr_triage::merge::MergeExecutor;
use pr_triage::pipeline::{PipelineEvaluator, SoftFailMatcher};
use pr_triage::types::{
    CheckRun, CheckRunOutput, CombinedStatus, CommitStatus, MergeMethod, MergeableState,
    PullRequestCandidate, RepoRef,
};
use std::sync::Arc;

pub const TRUSTED_AUTHOR: &str = "renovate[bot]";
pub const TEST_TOKEN: &str = "test-token";

/// Fixed clock used by every engine test
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

/// A trusted, mergeable, hour-old PR with one commit
pub fn make_candidate(number: u64) -> PullRequestCandidate {
    PullRequestCandidate {
        repository: RepoRef::new("octo", "hello"),
        number,
        title: format!("chore(deps): update dependency {number}"),
        html_url: format!("https://github.com/octo/hello/pull/{number}"),
        author: TRUSTED_AUTHOR.to_string(),
        head_ref: format!("renovate/dep-{number}"),
        base_ref: "main".to_string(),
        head_sha: format!("sha{number}"),
        head_repo_id: Some(1),
        base_repo_id: 1,
        head_clone_url: Some("https://github.com/octo/hello.git".to_string()),
        base_clone_url: "https://github.com/octo/hello.git".to_string(),
        mergeable_state: MergeableState::Mergeable,
        is_draft: false,
        commit_count: 1,
        created_at: fixed_now() - Duration::hours(1),
    }
}

/// Same PR, but from a fork
pub fn make_fork_candidate(number: u64) -> PullRequestCandidate {
    PullRequestCandidate {
        head_repo_id: Some(2),
        head_clone_url: Some("https://github.com/forker/hello.git".to_string()),
        ..make_candidate(number)
    }
}

pub fn commit_status(state: &str, context: &str, description: &str) -> CommitStatus {
    CommitStatus {
        state: state.to_string(),
        context: context.to_string(),
        description: Some(description.to_string()),
    }
}

pub fn combined_status(state: &str, statuses: Vec<CommitStatus>) -> CombinedStatus {
    CombinedStatus {
        state: state.to_string(),
        total_count: statuses.len() as u64,
        statuses,
    }
}

pub fn check_run(id: u64, name: &str, status: &str, conclusion: Option<&str>) -> CheckRun {
    CheckRun {
        id,
        name: name.to_string(),
        status: status.to_string(),
        conclusion: conclusion.map(ToString::to_string),
        output: None,
    }
}

pub fn check_run_with_output(id: u64, name: &str, title: &str, summary: &str) -> CheckRun {
    CheckRun {
        output: Some(CheckRunOutput {
            title: Some(title.to_string()),
            summary: Some(summary.to_string()),
        }),
        ..check_run(id, name, "completed", Some("failure"))
    }
}

pub fn bot() -> BotIdentity {
    BotIdentity {
        name: "Triage Bot".to_string(),
        email: "bot@example.com".to_string(),
    }
}

pub fn evaluator(platform: &Arc<MockPlatformService>) -> PipelineEvaluator {
    PipelineEvaluator::new(
        platform.clone(),
        SoftFailMatcher::new(["billing", "spending limit", "account payments"]),
    )
}

pub fn executor(platform: &Arc<MockPlatformService>, ai: &Arc<MockAiAssistant>) -> MergeExecutor {
    MergeExecutor::new(platform.clone(), ai.clone(), MergeMethod::Squash, "auto-merged")
}

pub fn resolver(git: &Arc<MockGitRunner>, ai: &Arc<MockAiAssistant>) -> AutonomousResolver {
    AutonomousResolver::new(
        git.clone(),
        ai.clone(),
        TEST_TOKEN,
        bot(),
        std::time::Duration::from_secs(5),
    )
}

/// Everything an engine test needs to inspect
pub struct Harness {
    pub platform: Arc<MockPlatformService>,
    pub ai: Arc<MockAiAssistant>,
    pub git: Arc<MockGitRunner>,
    pub engine: DecisionEngine,
}

impl Harness {
    /// Engine with autonomous conflict resolution
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Engine that only notifies on conflicts
    pub fn notify_only() -> Self {
        Self::build(false)
    }

    fn build(auto_resolve: bool) -> Self {
        let platform = Arc::new(MockPlatformService::new());
        let ai = Arc::new(MockAiAssistant::new());
        let git = Arc::new(MockGitRunner::new());

        let strategy: Arc<dyn ConflictResolutionStrategy> = if auto_resolve {
            Arc::new(resolver(&git, &ai))
        } else {
            Arc::new(NotifyOnly)
        };
        let engine = DecisionEngine::new(
            Arc::new(TrustedAuthorPolicy::new(
                [TRUSTED_AUTHOR, "dependabot[bot]"],
                Duration::minutes(10),
            )),
            evaluator(&platform),
            strategy,
            executor(&platform, &ai),
        );

        Self {
            platform,
            ai,
            git,
            engine,
        }
    }
}
