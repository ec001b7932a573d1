//! Platform service factory

use crate::auth::GitHubAuthConfig;
use crate::config::TriageConfig;
use crate::error::Result;
use crate::platform::{GitHubService, PlatformService};
use std::sync::Arc;

/// Create the platform service described by the configuration
pub fn create_platform_service(
    config: &TriageConfig,
    auth: &GitHubAuthConfig,
) -> Result<Arc<dyn PlatformService>> {
    let service = GitHubService::new(&auth.token, config.github_host.as_deref())?;
    Ok(Arc::new(service))
}
