//! PR mutations: merging, labelling and author notifications

pub mod comments;
mod execute;

pub use comments::{CONFLICT_MARKER, PIPELINE_FAILURE_MARKER};
pub use execute::MergeExecutor;
