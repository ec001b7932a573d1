//! AI capabilities used by the triage engine
//!
//! The engine only sees [`AiAssistant`]; which model sits behind it is a
//! configuration concern.

mod gemini;
mod ollama;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;

use crate::config::{AiConfig, AiProvider};
use crate::error::{Error, Result};
use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[\w+-]*\n(.*?)```").expect("static regex is valid")
});

/// Text-generation capability injected into the engine
#[async_trait]
pub trait AiAssistant: Send + Sync {
    /// Resolve one conflict block, given the whole file for context.
    ///
    /// Returns replacement text for exactly the block, without markers.
    async fn resolve_conflict(&self, file_content: &str, conflict_block: &str) -> Result<String>;

    /// Write a PR comment asking the author to fix the described problem
    async fn generate_comment(&self, issue_description: &str) -> Result<String>;
}

/// Assistant that refuses every request.
///
/// Used when no provider is configured; callers fall back to their
/// deterministic templates.
pub struct DisabledAssistant;

#[async_trait]
impl AiAssistant for DisabledAssistant {
    async fn resolve_conflict(&self, _file_content: &str, _conflict_block: &str) -> Result<String> {
        Err(Error::Ai("no AI provider configured".to_string()))
    }

    async fn generate_comment(&self, _issue_description: &str) -> Result<String> {
        Err(Error::Ai("no AI provider configured".to_string()))
    }
}

/// Create the assistant described by the configuration
pub fn create_ai_assistant(config: &AiConfig) -> Result<Arc<dyn AiAssistant>> {
    match config.provider {
        AiProvider::Gemini => Ok(Arc::new(GeminiClient::new(config)?)),
        AiProvider::Ollama => Ok(Arc::new(OllamaClient::new(config)?)),
    }
}

pub(crate) fn conflict_prompt(file_content: &str, conflict_block: &str) -> String {
    format!(
        "You are an expert software engineer. Resolve the following git merge conflict.\n\
         Here is the context of the file:\n```\n{file_content}\n```\n\
         Here is the conflict block:\n```\n{conflict_block}\n```\n\
         Return ONLY the resolved code for the conflict block, without markers or markdown formatting."
    )
}

pub(crate) fn comment_prompt(issue_description: &str) -> String {
    format!(
        "You are a friendly CI assistant. The pipeline failed with the following error: \
         {issue_description}. Please write a comment for the PR author asking them to correct \
         these issues."
    )
}

/// Normalize a model reply to a conflict block replacement.
///
/// If the reply wraps code in a fenced block, only the fenced body is kept.
/// The result is right-trimmed and ends with exactly one newline, unless the
/// model chose to drop the block entirely, in which case it is empty.
pub fn extract_resolved_block(reply: &str) -> String {
    let body = CODE_FENCE
        .captures(reply)
        .and_then(|c| c.get(1))
        .map_or(reply, |m| m.as_str())
        .trim_end();
    if body.trim().is_empty() {
        return String::new();
    }
    format!("{body}\n")
}
