//! Auth command - show which GitHub credentials would be used

use crate::cli::style::{Stylize, check};
use anstream::println;
use pr_triage::auth::{get_github_auth, test_github_auth};
use pr_triage::config::TriageConfig;
use pr_triage::error::Result;
use std::path::Path;

/// Run the auth command
pub async fn run_auth(config_path: Option<&Path>) -> Result<()> {
    let config = TriageConfig::load(config_path)?;
    let auth = get_github_auth(config.github_host.as_deref()).await?;
    println!("{} {}", "Token source:".muted(), auth.source.emphasis());

    let login = test_github_auth(&auth).await?;
    println!("{} Authenticated as {}", check(), login.accent());
    Ok(())
}
