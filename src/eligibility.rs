//! Author allowlist and minimum-age checks

use crate::types::{PullRequestCandidate, SkipReason};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// Decides whether a PR may be acted on at all
pub trait EligibilityPolicy: Send + Sync {
    /// `Err` carries the skip reason for the first failed check
    fn check(
        &self,
        candidate: &PullRequestCandidate,
        now: DateTime<Utc>,
    ) -> Result<(), SkipReason>;
}

/// Trusts a fixed set of authors and waits for PRs to settle
///
/// GitHub computes mergeability asynchronously after a push, so very fresh
/// PRs are deferred to the next run instead of being judged on stale state.
#[derive(Debug, Clone)]
pub struct TrustedAuthorPolicy {
    trusted_authors: HashSet<String>,
    min_age: Duration,
}

impl TrustedAuthorPolicy {
    /// Create a policy
    pub fn new<I, S>(trusted_authors: I, min_age: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            trusted_authors: trusted_authors.into_iter().map(Into::into).collect(),
            min_age,
        }
    }

    /// Whether `author` is on the allowlist
    pub fn is_trusted(&self, author: &str) -> bool {
        self.trusted_authors.contains(author)
    }

    /// Whether the PR is younger than the minimum age at `now`
    pub fn is_too_young(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - created_at < self.min_age
    }
}

impl EligibilityPolicy for TrustedAuthorPolicy {
    fn check(
        &self,
        candidate: &PullRequestCandidate,
        now: DateTime<Utc>,
    ) -> Result<(), SkipReason> {
        if !self.is_trusted(&candidate.author) {
            return Err(SkipReason::UnauthorizedAuthor);
        }
        if self.is_too_young(candidate.created_at, now) {
            return Err(SkipReason::PrTooYoung);
        }
        Ok(())
    }
}
