//! GitHub token discovery

use super::AuthSource;
use crate::error::{Error, Result};
use crate::platform::GitHubService;
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolved GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Access token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
    /// GitHub Enterprise host, if any
    pub host: Option<String>,
}

/// Find a GitHub token: `GITHUB_TOKEN`, `GH_TOKEN`, then `gh auth token`
pub async fn get_github_auth(host: Option<&str>) -> Result<GitHubAuthConfig> {
    for var in TOKEN_ENV_VARS {
        if let Ok(token) = std::env::var(var)
            && !token.trim().is_empty()
        {
            debug!(var, "using GitHub token from environment");
            return Ok(GitHubAuthConfig {
                token: token.trim().to_string(),
                source: AuthSource::EnvVar,
                host: host.map(ToString::to_string),
            });
        }
    }

    if let Some(token) = token_from_gh_cli(host).await {
        debug!("using GitHub token from gh CLI");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
            host: host.map(ToString::to_string),
        });
    }

    Err(Error::Auth(
        "no GitHub token found. Set GITHUB_TOKEN or run 'gh auth login'".to_string(),
    ))
}

async fn token_from_gh_cli(host: Option<&str>) -> Option<String> {
    let mut cmd = Command::new("gh");
    cmd.args(["auth", "token"]);
    if let Some(h) = host {
        cmd.args(["--hostname", h]);
    }

    let output = cmd.output().await.ok()?;
    if !output.status.success() {
        debug!("gh auth token exited with {}", output.status);
        return None;
    }
    let token = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!token.is_empty()).then_some(token)
}

/// Verify the token works and return the authenticated login
pub async fn test_github_auth(config: &GitHubAuthConfig) -> Result<String> {
    let service = GitHubService::new(&config.token, config.host.as_deref())?;
    service
        .current_login()
        .await
        .map_err(|e| Error::Auth(format!("token rejected by GitHub: {e}")))
}
