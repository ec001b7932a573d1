//! Merge conflict detection and autonomous resolution
//!
//! - [`markers`]: pure scanning and splicing of conflict regions
//! - [`git`]: the git subprocess boundary
//! - [`resolve`]: the clone, merge, resolve, push pipeline

pub mod git;
pub mod markers;
pub mod resolve;

pub use git::{GitOutput, GitRunner, SystemGit};
pub use markers::{ConflictRegion, contains_conflict_markers, find_conflict_regions};
pub use resolve::{
    AutonomousResolver, ConflictResolutionStrategy, NotifyOnly, RESOLUTION_COMMIT_MESSAGE,
    resolve_content,
};
