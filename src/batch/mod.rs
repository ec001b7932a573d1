//! Batch processing of open PRs
//!
//! The runner holds no state across invocations: every run re-derives all
//! decisions from live PR state, so an interrupted run is safe to repeat.

mod notify;
mod runner;
mod summary;

pub use notify::{JsonFileNotifier, LogNotifier, Notifier};
pub use runner::{BatchRunner, BatchTarget};
pub use summary::{BatchItem, BatchSummary};
