//! Autonomous conflict resolution in a throwaway clone

use super::git::{GitRunner, run_checked};
use super::markers::{contains_conflict_markers, find_next_region, splice_region};
use crate::ai::AiAssistant;
use crate::config::BotIdentity;
use crate::error::{Error, Result};
use crate::platform::{authenticated_clone_url, redact_credentials, redact_secret};
use crate::types::PullRequestCandidate;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Commit message for AI-resolved merges
pub const RESOLUTION_COMMIT_MESSAGE: &str = "fix: resolve merge conflicts via AI agent";

const CLONE_DIR: &str = "repo";
const UPSTREAM_REMOTE: &str = "upstream";

/// How a conflicted PR is handled before falling back to a human
#[async_trait]
pub trait ConflictResolutionStrategy: Send + Sync {
    /// Try to fix the PR's conflicts; `true` only if the fix was pushed.
    ///
    /// Never fails past this boundary.
    async fn resolve(&self, candidate: &PullRequestCandidate) -> bool;
}

/// Never attempts a fix, so every conflict goes to the author
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifyOnly;

#[async_trait]
impl ConflictResolutionStrategy for NotifyOnly {
    async fn resolve(&self, _candidate: &PullRequestCandidate) -> bool {
        false
    }
}

/// Clones the head branch, merges the base, lets the AI rewrite each
/// conflict region and pushes the result
pub struct AutonomousResolver {
    git: Arc<dyn GitRunner>,
    ai: Arc<dyn AiAssistant>,
    token: String,
    bot: BotIdentity,
    ai_timeout: Duration,
}

impl AutonomousResolver {
    /// Create a resolver
    pub fn new(
        git: Arc<dyn GitRunner>,
        ai: Arc<dyn AiAssistant>,
        token: impl Into<String>,
        bot: BotIdentity,
        ai_timeout: Duration,
    ) -> Self {
        Self {
            git,
            ai,
            token: token.into(),
            bot,
            ai_timeout,
        }
    }

    async fn attempt(&self, candidate: &PullRequestCandidate, workspace: &Path) -> Result<()> {
        let git = self.git.as_ref();
        let head_url = candidate
            .head_clone_url
            .as_deref()
            .ok_or_else(|| Error::Git("head repository no longer exists".to_string()))?;
        let clone_url = authenticated_clone_url(head_url, &self.token)?;

        run_checked(git, workspace, &["clone", &clone_url, CLONE_DIR]).await?;
        let repo = workspace.join(CLONE_DIR);

        run_checked(git, &repo, &["config", "user.name", &self.bot.name]).await?;
        run_checked(git, &repo, &["config", "user.email", &self.bot.email]).await?;
        run_checked(git, &repo, &["checkout", &candidate.head_ref]).await?;

        let remote = if candidate.is_fork() {
            let upstream = authenticated_clone_url(&candidate.base_clone_url, &self.token)?;
            run_checked(git, &repo, &["remote", "add", UPSTREAM_REMOTE, &upstream]).await?;
            run_checked(git, &repo, &["fetch", UPSTREAM_REMOTE, &candidate.base_ref]).await?;
            UPSTREAM_REMOTE
        } else {
            run_checked(git, &repo, &["fetch", "origin", &candidate.base_ref]).await?;
            "origin"
        };
        let target = format!("{remote}/{}", candidate.base_ref);

        let merge = git.run(&repo, &["merge", &target, "--no-edit"]).await?;
        if merge.success {
            info!(%target, "merge was clean, pushing without AI");
            return self.push(&repo, candidate).await;
        }

        let unmerged = run_checked(git, &repo, &["diff", "--name-only", "--diff-filter=U"]).await?;
        let paths: Vec<&str> = unmerged
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if paths.is_empty() {
            return Err(Error::Git(format!(
                "merge of {target} failed without conflicted files: {}",
                redact_credentials(merge.stderr.trim())
            )));
        }

        let mut staged = 0usize;
        for path in paths {
            let file = repo.join(path);
            let bytes = tokio::fs::read(&file).await?;
            let Ok(content) = String::from_utf8(bytes) else {
                warn!(path, "skipping non-text conflicted file");
                continue;
            };

            let resolved = resolve_content(self.ai.as_ref(), &content, self.ai_timeout).await?;
            tokio::fs::write(&file, resolved).await?;
            run_checked(git, &repo, &["add", "--", path]).await?;
            debug!(path, "resolved conflicted file");
            staged += 1;
        }

        if staged == 0 {
            return Err(Error::Validation(
                "no conflicted file could be resolved as text".to_string(),
            ));
        }

        run_checked(git, &repo, &["commit", "-m", RESOLUTION_COMMIT_MESSAGE]).await?;
        self.push(&repo, candidate).await
    }

    async fn push(&self, repo: &Path, candidate: &PullRequestCandidate) -> Result<()> {
        run_checked(
            self.git.as_ref(),
            repo,
            &["push", "origin", &candidate.head_ref],
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ConflictResolutionStrategy for AutonomousResolver {
    async fn resolve(&self, candidate: &PullRequestCandidate) -> bool {
        let prefix = format!(
            "pr_{}_{}_{}_",
            candidate.repository.owner, candidate.repository.name, candidate.number
        );
        let workspace = match tempfile::Builder::new().prefix(&prefix).tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                warn!(error = %e, "could not create workspace");
                return false;
            }
        };
        debug!(workspace = %workspace.path().display(), "attempting conflict resolution");

        // The TempDir is dropped on every return below, and also when this
        // future is cancelled mid-await.
        match self.attempt(candidate, workspace.path()).await {
            Ok(()) => {
                info!("conflicts resolved and pushed");
                true
            }
            Err(e) => {
                let error = redact_secret(&e.to_string(), &self.token);
                warn!(%error, "conflict resolution failed");
                false
            }
        }
    }
}

/// Resolve every conflict region in one file's content.
///
/// Regions are replaced one at a time, scanning forward from the end of each
/// replacement. Any replacement that still carries a marker token fails the
/// whole file.
pub async fn resolve_content(
    ai: &dyn AiAssistant,
    content: &str,
    ai_timeout: Duration,
) -> Result<String> {
    let mut text = content.to_string();
    let mut from = 0;

    while let Some(region) = find_next_region(&text, from) {
        let block = region.raw(&text).to_string();
        let replacement = tokio::time::timeout(ai_timeout, ai.resolve_conflict(&text, &block))
            .await
            .map_err(|_| Error::Timeout(format!("AI resolution exceeded {ai_timeout:?}")))??;

        if contains_conflict_markers(&replacement) {
            return Err(Error::Validation(
                "AI resolution still contains conflict markers".to_string(),
            ));
        }

        let (next, resume) = splice_region(&text, &region, &replacement);
        text = next;
        from = resume;
    }

    if contains_conflict_markers(&text) {
        return Err(Error::Validation(
            "file still contains conflict markers after resolution".to_string(),
        ));
    }
    Ok(text)
}
