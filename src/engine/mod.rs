//! Decision engine
//!
//! Two-phase pattern:
//! 1. Plan - route a snapshot to its next step (pure, testable)
//! 2. Decide - run the routed steps against the platform (effectful)

mod decide;
mod plan;

pub use decide::DecisionEngine;
pub use plan::{MergeabilityRoute, PipelineRoute, route_by_mergeability, route_by_pipeline};
