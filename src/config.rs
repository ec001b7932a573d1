//! Configuration loading
//!
//! Precedence, lowest to highest: built-in defaults, the TOML config file,
//! environment variables, then CLI overrides applied by the caller.

use crate::error::{Error, Result};
use crate::types::MergeMethod;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name for pr-triage under the user config dir
const CONFIG_DIR: &str = "pr-triage";

/// Default config filename
const CONFIG_FILE: &str = "config.toml";

/// Authors trusted out of the box
const DEFAULT_TRUSTED_AUTHORS: [&str; 7] = [
    "juninmd",
    "Copilot",
    "imgbot[bot]",
    "renovate[bot]",
    "dependabot[bot]",
    "Jules da Google",
    "google-labs-jules[bot]",
];

/// Which AI backend resolves conflicts and writes comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// Google Gemini REST API
    #[default]
    Gemini,
    /// Local Ollama server
    Ollama,
}

impl std::str::FromStr for AiProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(Error::Config(format!(
                "unknown AI provider '{other}' (expected gemini or ollama)"
            ))),
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

/// AI provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Provider to use
    pub provider: AiProvider,
    /// Model name; provider default when unset
    pub model: Option<String>,
    /// Base URL override
    pub base_url: Option<String>,
    /// API key (Gemini)
    pub api_key: Option<String>,
    /// Upper bound for a single AI call
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::Gemini,
            model: None,
            base_url: None,
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl AiConfig {
    /// Model name, falling back to the provider default
    pub fn model_name(&self) -> &str {
        self.model.as_deref().unwrap_or(match self.provider {
            AiProvider::Gemini => "gemini-1.5-pro",
            AiProvider::Ollama => "llama3",
        })
    }

    /// Timeout as a [`Duration`]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Identity used for commits made while resolving conflicts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotIdentity {
    /// `user.name`
    pub name: String,
    /// `user.email`
    pub email: String,
}

impl Default for BotIdentity {
    fn default() -> Self {
        Self {
            name: "PR Triage Bot".to_string(),
            email: "pr-triage@users.noreply.github.com".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Account whose repositories are scanned
    pub owner: String,
    /// GitHub Enterprise host; github.com when unset
    pub github_host: Option<String>,
    /// Authors whose PRs may be acted on
    pub trusted_authors: Vec<String>,
    /// PRs younger than this are deferred to the next run
    pub min_pr_age_minutes: i64,
    /// How PRs are merged
    pub merge_method: MergeMethod,
    /// Label attached after a successful merge
    pub merge_label: String,
    /// Attempt AI conflict resolution before asking a human
    pub auto_resolve_conflicts: bool,
    /// Failure texts treated as non-blocking (case-insensitive substrings)
    pub soft_fail_patterns: Vec<String>,
    /// Number of PRs processed at once
    pub concurrency: usize,
    /// Upper bound for processing a single PR
    pub pr_timeout_secs: u64,
    /// Where the JSON batch summary is written, if anywhere
    pub output_dir: Option<PathBuf>,
    /// Commit identity
    pub bot: BotIdentity,
    /// AI provider settings
    pub ai: AiConfig,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            owner: "juninmd".to_string(),
            github_host: None,
            trusted_authors: DEFAULT_TRUSTED_AUTHORS
                .iter()
                .map(ToString::to_string)
                .collect(),
            min_pr_age_minutes: 10,
            merge_method: MergeMethod::Merge,
            merge_label: "auto-merged".to_string(),
            auto_resolve_conflicts: true,
            soft_fail_patterns: vec![
                "billing".to_string(),
                "spending limit".to_string(),
                "account payments".to_string(),
            ],
            concurrency: 1,
            pr_timeout_secs: 900,
            output_dir: None,
            bot: BotIdentity::default(),
            ai: AiConfig::default(),
        }
    }
}

impl TriageConfig {
    /// Default config path (`~/.config/pr-triage/config.toml` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("invalid config: {e}")))
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Load from an explicit path, or the default path when it exists,
    /// then apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(owner) = get("GITHUB_OWNER") {
            self.owner = owner;
        }
        if let Some(provider) = get("AI_PROVIDER") {
            self.ai.provider = provider.parse()?;
        }
        if let Some(model) = get("AI_MODEL") {
            self.ai.model = Some(model);
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.ai.api_key = Some(key);
        }
        if let Some(url) = get("OLLAMA_BASE_URL")
            && self.ai.provider == AiProvider::Ollama
        {
            self.ai.base_url = Some(url);
        }
        Ok(())
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.owner.trim().is_empty() {
            return Err(Error::Config("owner must not be empty".to_string()));
        }
        if self.trusted_authors.is_empty() {
            return Err(Error::Config(
                "trusted_authors must list at least one author".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }
        if self.min_pr_age_minutes < 0 {
            return Err(Error::Config(
                "min_pr_age_minutes must not be negative".to_string(),
            ));
        }
        if chrono::Duration::try_minutes(self.min_pr_age_minutes).is_none() {
            return Err(Error::Config(format!(
                "min_pr_age_minutes is out of range: {}",
                self.min_pr_age_minutes
            )));
        }
        if self.pr_timeout_secs == 0 {
            return Err(Error::Config(
                "pr_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.auto_resolve_conflicts
            && self.ai.provider == AiProvider::Gemini
            && self.ai.api_key.is_none()
        {
            return Err(Error::Config(
                "GEMINI_API_KEY is required when the gemini provider is used".to_string(),
            ));
        }
        Ok(())
    }

    /// Search query for the owner's open PRs
    pub fn search_query(&self) -> String {
        format!("is:pr is:open user:{}", self.owner)
    }

    /// Minimum PR age as a chrono duration, saturating when out of range
    pub fn min_pr_age(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.min_pr_age_minutes).unwrap_or(chrono::Duration::MAX)
    }

    /// Per-PR time budget
    pub const fn pr_timeout(&self) -> Duration {
        Duration::from_secs(self.pr_timeout_secs)
    }
}
