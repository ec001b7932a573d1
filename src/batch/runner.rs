//! Runs the decision engine over every listed PR

use super::summary::{BatchItem, BatchSummary};
use crate::engine::DecisionEngine;
use crate::error::Result;
use crate::platform::{PlatformService, PrReference};
use crate::types::{PrListing, ProcessingOutcome, SkipReason};
use chrono::Utc;
use futures::{FutureExt, StreamExt, stream};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, error, info, info_span};

/// Which PRs a run covers
#[derive(Debug, Clone)]
pub enum BatchTarget {
    /// Every PR matching a search query
    Search(String),
    /// Exactly one PR
    Single(PrReference),
}

/// Per-PR result before tallying
enum PrResult {
    Draft,
    Processed(BatchItem),
}

/// Iterates PRs with a bounded worker pool and isolates per-PR failures
pub struct BatchRunner {
    platform: Arc<dyn PlatformService>,
    engine: Arc<DecisionEngine>,
    concurrency: usize,
    pr_timeout: Duration,
}

impl BatchRunner {
    /// Create a runner
    pub fn new(
        platform: Arc<dyn PlatformService>,
        engine: Arc<DecisionEngine>,
        concurrency: usize,
        pr_timeout: Duration,
    ) -> Self {
        Self {
            platform,
            engine,
            concurrency: concurrency.max(1),
            pr_timeout,
        }
    }

    /// Process every PR in `target`.
    ///
    /// Only a failed listing call is returned as an error; anything that
    /// goes wrong for a single PR becomes that PR's `Skipped` outcome.
    pub async fn run(&self, target: &BatchTarget) -> Result<BatchSummary> {
        let started_at = Utc::now();
        let listings = match target {
            BatchTarget::Search(query) => self.platform.search_open_prs(query).await?,
            BatchTarget::Single(reference) => vec![PrListing {
                repository: reference.repository.clone(),
                number: reference.number,
                title: String::new(),
                html_url: String::new(),
            }],
        };
        info!(count = listings.len(), "found open pull requests");

        let results: Vec<PrResult> = stream::iter(listings.iter())
            .map(|listing| self.process_listing(listing))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut summary = BatchSummary::new(started_at, listings.len());
        for result in results {
            match result {
                PrResult::Draft => summary.record_draft(),
                PrResult::Processed(item) => summary.record(item),
            }
        }
        Ok(summary)
    }

    /// The per-PR failure boundary
    async fn process_listing(&self, listing: &PrListing) -> PrResult {
        let span = info_span!("pr", repo = %listing.repository, number = listing.number);
        let guarded = AssertUnwindSafe(self.fetch_and_process(listing)).catch_unwind();

        let result = match tokio::time::timeout(self.pr_timeout, guarded)
            .instrument(span.clone())
            .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => {
                let message = panic_message(panic.as_ref());
                span.in_scope(|| error!(%message, "processing panicked"));
                PrResult::Processed(BatchItem::new(listing, skipped_error(message)))
            }
            Err(_) => {
                let message = format!("timed out after {:?}", self.pr_timeout);
                span.in_scope(|| error!(%message, "processing timed out"));
                PrResult::Processed(BatchItem::new(listing, skipped_error(message)))
            }
        };

        if let PrResult::Processed(item) = &result {
            span.in_scope(|| info!(outcome = %item.outcome, "done"));
        }
        result
    }

    async fn fetch_and_process(&self, listing: &PrListing) -> PrResult {
        let candidate = match self
            .platform
            .get_candidate(&listing.repository, listing.number)
            .await
        {
            Ok(candidate) => candidate,
            Err(e) => {
                error!(error = %e, "could not load PR");
                return PrResult::Processed(BatchItem::new(listing, skipped_error(e.to_string())));
            }
        };

        if candidate.is_draft {
            info!("draft, not processing");
            return PrResult::Draft;
        }

        let listing = PrListing {
            repository: candidate.repository.clone(),
            number: candidate.number,
            title: candidate.title.clone(),
            html_url: candidate.html_url.clone(),
        };
        let outcome = self.engine.process(&candidate, Utc::now()).await;
        PrResult::Processed(BatchItem::new(&listing, outcome))
    }
}

fn skipped_error(message: impl Into<String>) -> ProcessingOutcome {
    ProcessingOutcome::Skipped(SkipReason::Error(message.into()))
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unexpected panic".to_string())
}
