//! Consumers of the end-of-run summary

use super::summary::BatchSummary;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Receives the summary after every run
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the summary
    async fn notify(&self, summary: &BatchSummary) -> Result<()>;
}

/// Writes the summary to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, summary: &BatchSummary) -> Result<()> {
        info!(
            found = summary.total_found,
            drafts = summary.drafts,
            merged = summary.merged,
            conflicts_resolved = summary.conflicts_resolved,
            conflicts_notified = summary.conflicts_notified,
            pipeline_failures = summary.pipeline_failures,
            merge_failures = summary.merge_failures,
            skipped = summary.skipped,
            "run complete"
        );
        for item in summary.items_with_label("merge_failed") {
            warn!(
                pr = %format!("{}#{}", item.repository, item.number),
                reason = item.reason().unwrap_or_default(),
                "merge failed"
            );
        }
        Ok(())
    }
}

/// Writes the summary as pretty JSON into a directory
#[derive(Debug, Clone)]
pub struct JsonFileNotifier {
    dir: PathBuf,
}

impl JsonFileNotifier {
    /// Write reports into `dir`, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Report path for a summary
    pub fn path_for(&self, summary: &BatchSummary) -> PathBuf {
        self.dir.join(format!(
            "pr-triage-{}.json",
            summary.started_at.format("%Y%m%dT%H%M%SZ")
        ))
    }

    async fn write(&self, path: &Path, summary: &BatchSummary) -> Result<()> {
        let json = serde_json::to_string_pretty(summary)
            .map_err(|e| Error::Internal(format!("failed to serialize summary: {e}")))?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for JsonFileNotifier {
    async fn notify(&self, summary: &BatchSummary) -> Result<()> {
        let path = self.path_for(summary);
        self.write(&path, summary).await?;
        info!(path = %path.display(), "wrote run report");
        Ok(())
    }
}
