//! Mock AI assistant for testing

#![allow(dead_code)]

use async_trait::async_trait;
use pr_triage::ai::AiAssistant;
use pr_triage::error::{Error, Result};
use std::sync::Mutex;
use std::time::Duration;

/// Call record for `resolve_conflict`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveCall {
    pub file_content: String,
    pub conflict_block: String,
}

/// Scripted AI assistant
///
/// Conflict replies are either a fixed text for every block or a closure
/// over the block; comment replies are fixed. Either can be made to fail
/// or to hang until cancelled.
pub struct MockAiAssistant {
    resolve_reply: Mutex<Option<Box<dyn Fn(&str) -> String + Send>>>,
    comment_reply: Mutex<String>,
    resolve_calls: Mutex<Vec<ResolveCall>>,
    comment_calls: Mutex<Vec<String>>,
    error_on_resolve: Mutex<Option<String>>,
    error_on_comment: Mutex<Option<String>>,
    hang_on_resolve: Mutex<bool>,
}

impl Default for MockAiAssistant {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAiAssistant {
    pub fn new() -> Self {
        Self {
            resolve_reply: Mutex::new(None),
            comment_reply: Mutex::new("Please fix the failing checks.".to_string()),
            resolve_calls: Mutex::new(Vec::new()),
            comment_calls: Mutex::new(Vec::new()),
            error_on_resolve: Mutex::new(None),
            error_on_comment: Mutex::new(None),
            hang_on_resolve: Mutex::new(false),
        }
    }

    /// Reply with `text` for every conflict block
    pub fn resolve_with(&self, text: &str) {
        let text = text.to_string();
        *self.resolve_reply.lock().unwrap() = Some(Box::new(move |_| text.clone()));
    }

    /// Compute the reply from the conflict block
    pub fn resolve_by(&self, f: impl Fn(&str) -> String + Send + 'static) {
        *self.resolve_reply.lock().unwrap() = Some(Box::new(f));
    }

    pub fn comment_with(&self, text: &str) {
        *self.comment_reply.lock().unwrap() = text.to_string();
    }

    pub fn fail_resolve(&self, msg: &str) {
        *self.error_on_resolve.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_comment(&self, msg: &str) {
        *self.error_on_comment.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `resolve_conflict` never return
    pub fn hang_resolve(&self) {
        *self.hang_on_resolve.lock().unwrap() = true;
    }

    pub fn get_resolve_calls(&self) -> Vec<ResolveCall> {
        self.resolve_calls.lock().unwrap().clone()
    }

    pub fn get_comment_calls(&self) -> Vec<String> {
        self.comment_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiAssistant for MockAiAssistant {
    async fn resolve_conflict(&self, file_content: &str, conflict_block: &str) -> Result<String> {
        self.resolve_calls.lock().unwrap().push(ResolveCall {
            file_content: file_content.to_string(),
            conflict_block: conflict_block.to_string(),
        });

        let hang = *self.hang_on_resolve.lock().unwrap();
        if hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }

        if let Some(msg) = self.error_on_resolve.lock().unwrap().as_ref() {
            return Err(Error::Ai(msg.clone()));
        }
        let reply = self
            .resolve_reply
            .lock()
            .unwrap()
            .as_ref()
            .map_or_else(|| "resolved\n".to_string(), |f| f(conflict_block));
        Ok(reply)
    }

    async fn generate_comment(&self, issue_description: &str) -> Result<String> {
        self.comment_calls
            .lock()
            .unwrap()
            .push(issue_description.to_string());
        if let Some(msg) = self.error_on_comment.lock().unwrap().as_ref() {
            return Err(Error::Ai(msg.clone()));
        }
        Ok(self.comment_reply.lock().unwrap().clone())
    }
}
