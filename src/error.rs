//! Error types for pr-triage

use thiserror::Error;

/// Errors produced while triaging pull requests
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub REST/GraphQL call failed or returned something unexpected
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform service failure (used by non-GitHub implementations)
    #[error("platform error: {0}")]
    Platform(String),

    /// No usable GitHub credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// A git subprocess failed
    #[error("git error: {0}")]
    Git(String),

    /// The AI provider failed or returned an unusable response
    #[error("AI provider error: {0}")]
    Ai(String),

    /// AI output still contained conflict markers
    #[error("conflict resolution rejected: {0}")]
    Validation(String),

    /// A PR reference could not be parsed
    #[error("invalid PR reference: {0}")]
    InvalidReference(String),

    /// An external call exceeded its time budget
    #[error("timed out: {0}")]
    Timeout(String),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error surfaced by octocrab
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Anything that should not happen
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
