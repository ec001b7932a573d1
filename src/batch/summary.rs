//! Aggregate result of one run

use crate::types::{PrListing, ProcessingOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One processed PR
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItem {
    /// `owner/repo`
    pub repository: String,
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR web URL
    pub url: String,
    /// Terminal outcome
    pub outcome: ProcessingOutcome,
}

impl BatchItem {
    /// Build an item from a listing and its outcome
    pub fn new(listing: &PrListing, outcome: ProcessingOutcome) -> Self {
        Self {
            repository: listing.repository.full_name(),
            number: listing.number,
            title: listing.title.clone(),
            url: listing.html_url.clone(),
            outcome,
        }
    }

    /// Outcome reason, if any
    pub fn reason(&self) -> Option<String> {
        self.outcome.reason()
    }
}

/// Counts per outcome category plus per-PR records
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// PRs returned by the listing
    pub total_found: usize,
    /// Draft PRs seen and left alone
    pub drafts: usize,
    /// Merged PRs
    pub merged: usize,
    /// PRs whose conflicts were resolved and pushed
    pub conflicts_resolved: usize,
    /// PRs whose authors were asked to resolve conflicts
    pub conflicts_notified: usize,
    /// PRs whose authors were told about failing pipelines
    pub pipeline_failures: usize,
    /// PRs where the merge call failed
    pub merge_failures: usize,
    /// PRs skipped for any reason
    pub skipped: usize,
    /// Every non-draft PR in listing order
    pub items: Vec<BatchItem>,
}

impl BatchSummary {
    /// Empty summary for a run that found `total_found` PRs
    pub const fn new(started_at: DateTime<Utc>, total_found: usize) -> Self {
        Self {
            started_at,
            total_found,
            drafts: 0,
            merged: 0,
            conflicts_resolved: 0,
            conflicts_notified: 0,
            pipeline_failures: 0,
            merge_failures: 0,
            skipped: 0,
            items: Vec::new(),
        }
    }

    /// Count a draft
    pub const fn record_draft(&mut self) {
        self.drafts += 1;
    }

    /// Count and keep one processed PR
    pub fn record(&mut self, item: BatchItem) {
        match item.outcome {
            ProcessingOutcome::Merged => self.merged += 1,
            ProcessingOutcome::ConflictsResolved => self.conflicts_resolved += 1,
            ProcessingOutcome::ConflictsDetectedNotified => self.conflicts_notified += 1,
            ProcessingOutcome::PipelineFailureReported(_) => self.pipeline_failures += 1,
            ProcessingOutcome::MergeFailed(_) => self.merge_failures += 1,
            ProcessingOutcome::Skipped(_) => self.skipped += 1,
        }
        self.items.push(item);
    }

    /// Items whose outcome has the given label
    pub fn items_with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a BatchItem> {
        self.items.iter().filter(move |i| i.outcome.label() == label)
    }

    /// Number of PRs that went through the engine
    pub fn processed(&self) -> usize {
        self.items.len()
    }
}
