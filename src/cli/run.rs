//! Run command - triage open PRs

use crate::cli::context::{Overrides, RunContext};
use crate::cli::style::{Stylize, check, link, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use pr_triage::batch::{BatchItem, BatchSummary, BatchTarget};
use pr_triage::error::Result;
use pr_triage::platform::parse_pr_reference;
use pr_triage::types::ProcessingOutcome;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Run the triage command
pub async fn run_triage(
    config_path: Option<&Path>,
    pr: Option<&str>,
    overrides: Overrides,
) -> Result<BatchSummary> {
    // Reject a bad reference before touching credentials or the network
    let single = pr.map(parse_pr_reference).transpose()?;

    let ctx = RunContext::new(config_path, overrides).await?;
    let target = match single {
        Some(reference) => BatchTarget::Single(reference),
        None => BatchTarget::Search(ctx.config.search_query()),
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(match &target {
        BatchTarget::Search(query) => format!("Triaging {}", query.emphasis()),
        BatchTarget::Single(reference) => format!(
            "Triaging {}#{}",
            reference.repository.full_name().emphasis(),
            reference.number
        ),
    });
    spinner.enable_steady_tick(Duration::from_millis(80));

    let summary = ctx.runner.run(&target).await;
    spinner.finish_and_clear();
    let summary = summary?;

    for notifier in &ctx.notifiers {
        if let Err(e) = notifier.notify(&summary).await {
            warn!(error = %e, "could not deliver run summary");
        }
    }

    print_summary(&summary);
    Ok(summary)
}

fn outcome_icon(outcome: &ProcessingOutcome) -> String {
    match outcome {
        ProcessingOutcome::Merged | ProcessingOutcome::ConflictsResolved => check(),
        ProcessingOutcome::ConflictsDetectedNotified
        | ProcessingOutcome::PipelineFailureReported(_) => "!".warn(),
        ProcessingOutcome::MergeFailed(_) => "✗".error(),
        ProcessingOutcome::Skipped(_) => "-".muted(),
    }
}

fn print_item(item: &BatchItem) {
    let id = format!("{}#{}", item.repository, item.number);
    println!(
        "  {} {} {} {}",
        outcome_icon(&item.outcome),
        link(&id, &item.url).accent(),
        item.title,
        format!("[{}]", item.outcome.label()).muted()
    );
    if let Some(reason) = item.reason()
        && !matches!(item.outcome, ProcessingOutcome::PipelineFailureReported(_))
    {
        println!("      {}", reason.muted());
    }
}

fn print_summary(summary: &BatchSummary) {
    println!(
        "{} {}",
        "Processed".emphasis(),
        format!(
            "{} of {} open PR(s), {} draft(s) ignored",
            summary.processed(),
            summary.total_found,
            summary.drafts
        )
        .accent()
    );
    for item in &summary.items {
        print_item(item);
    }
    println!();
    println!(
        "{} merged, {} resolved, {} conflicts notified, {} pipeline failures, {} merge failures, {} skipped",
        summary.merged.success(),
        summary.conflicts_resolved.success(),
        summary.conflicts_notified.warn(),
        summary.pipeline_failures.warn(),
        summary.merge_failures.error(),
        summary.skipped.muted()
    );
}
