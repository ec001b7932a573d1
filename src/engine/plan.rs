//! Decision routing - pure functions
//!
//! No I/O happens here. The engine gathers a snapshot and a pipeline status,
//! asks these functions where to go next, then performs the chosen step.

use crate::types::{MergeableState, PipelineOutcome, PipelineStatus, SkipReason};

/// Where a PR goes after the mergeability check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeabilityRoute {
    /// Conflicts: try the resolution strategy, then notify
    ResolveConflicts,
    /// Mergeable: evaluate the pipeline
    CheckPipeline,
    /// Stop here
    Skip(SkipReason),
}

/// What to do once the pipeline status is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineRoute {
    /// Green and mergeable
    Merge,
    /// Tell the author what failed
    ReportFailure,
    /// Stop here
    Skip(SkipReason),
}

impl std::fmt::Display for PipelineRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::ReportFailure => write!(f, "report pipeline failure"),
            Self::Skip(reason) => write!(f, "skip ({reason})"),
        }
    }
}

/// Route on GitHub's mergeability flag
pub const fn route_by_mergeability(state: MergeableState) -> MergeabilityRoute {
    match state {
        MergeableState::Unknown => MergeabilityRoute::Skip(SkipReason::MergeabilityUnknown),
        MergeableState::Conflicted => MergeabilityRoute::ResolveConflicts,
        MergeableState::Mergeable => MergeabilityRoute::CheckPipeline,
    }
}

/// Route on the evaluated pipeline.
///
/// A status that could not be determined is skipped rather than reported,
/// so transient API errors never produce author-facing comments.
pub fn route_by_pipeline(status: &PipelineStatus) -> PipelineRoute {
    match status.outcome {
        PipelineOutcome::Success => PipelineRoute::Merge,
        PipelineOutcome::Pending => PipelineRoute::Skip(SkipReason::PipelinePending),
        PipelineOutcome::Failure | PipelineOutcome::NoCommits => PipelineRoute::ReportFailure,
        PipelineOutcome::Error => PipelineRoute::Skip(SkipReason::Error(status.detail.clone())),
    }
}
