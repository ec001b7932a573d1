//! Shared setup for CLI commands
//!
//! Loads configuration, resolves credentials and wires the platform, AI and
//! git collaborators into a decision engine.

use pr_triage::ai::{AiAssistant, DisabledAssistant, create_ai_assistant};
use pr_triage::auth::get_github_auth;
use pr_triage::batch::{BatchRunner, JsonFileNotifier, LogNotifier, Notifier};
use pr_triage::config::{AiProvider, TriageConfig};
use pr_triage::conflict::SystemGit;
use pr_triage::engine::DecisionEngine;
use pr_triage::error::Result;
use pr_triage::platform::create_platform_service;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Command-line overrides, applied after file and environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--owner`
    pub owner: Option<String>,
    /// `--provider`
    pub provider: Option<AiProvider>,
    /// `--model`
    pub model: Option<String>,
    /// `--concurrency`
    pub concurrency: Option<usize>,
    /// `--output`
    pub output_dir: Option<PathBuf>,
    /// `--no-resolve`
    pub no_resolve: bool,
}

impl Overrides {
    fn apply(self, config: &mut TriageConfig) {
        if let Some(owner) = self.owner {
            config.owner = owner;
        }
        if let Some(provider) = self.provider {
            config.ai.provider = provider;
        }
        if let Some(model) = self.model {
            config.ai.model = Some(model);
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = Some(dir);
        }
        if self.no_resolve {
            config.auto_resolve_conflicts = false;
        }
    }
}

/// Everything a run needs
pub struct RunContext {
    /// Effective configuration
    pub config: TriageConfig,
    /// Batch runner wired to the engine
    pub runner: BatchRunner,
    /// Summary consumers
    pub notifiers: Vec<Box<dyn Notifier>>,
}

impl RunContext {
    /// Load config, authenticate and build the engine
    pub async fn new(config_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut config = TriageConfig::load(config_path)?;
        overrides.apply(&mut config);
        config.validate()?;

        let auth = get_github_auth(config.github_host.as_deref()).await?;
        debug!(source = %auth.source, "using GitHub credentials");
        let platform = create_platform_service(&config, &auth)?;

        let ai: Arc<dyn AiAssistant> = match create_ai_assistant(&config.ai) {
            Ok(ai) => ai,
            Err(e) => {
                warn!(error = %e, "AI assistant unavailable, using comment templates only");
                Arc::new(DisabledAssistant)
            }
        };

        let engine = DecisionEngine::from_config(
            &config,
            platform.clone(),
            ai,
            Arc::new(SystemGit),
            &auth.token,
        );
        let runner = BatchRunner::new(
            platform,
            Arc::new(engine),
            config.concurrency,
            config.pr_timeout(),
        );

        let mut notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(LogNotifier)];
        if let Some(dir) = &config.output_dir {
            notifiers.push(Box::new(JsonFileNotifier::new(dir)));
        }

        Ok(Self {
            config,
            runner,
            notifiers,
        })
    }
}
