//! Git subprocess boundary

use crate::error::{Error, Result};
use crate::platform::redact_credentials;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one git invocation
#[derive(Debug, Clone, Default)]
pub struct GitOutput {
    /// Exit status was zero
    pub success: bool,
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}

/// Runs git commands in a working directory
///
/// A non-zero exit is reported through [`GitOutput::success`], not as an
/// error; `Err` means the process could not be run at all.
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run `git <args>` inside `dir`
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput>;
}

/// Runs the `git` binary on `PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

#[async_trait]
impl GitRunner for SystemGit {
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput> {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::Git(format!("failed to run git: {e}")))?;

        Ok(GitOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Describe a git invocation without leaking tokens embedded in URLs
pub fn describe_command(args: &[&str]) -> String {
    let shown: Vec<String> = args.iter().map(|a| redact_credentials(a)).collect();
    format!("git {}", shown.join(" "))
}

/// Run git and turn a non-zero exit into [`Error::Git`]
pub async fn run_checked(git: &dyn GitRunner, dir: &Path, args: &[&str]) -> Result<GitOutput> {
    let command = describe_command(args);
    debug!(%command, "running git");
    let output = git.run(dir, args).await?;
    if !output.success {
        return Err(Error::Git(format!(
            "{command} failed: {}",
            redact_credentials(output.stderr.trim())
        )));
    }
    Ok(output)
}
