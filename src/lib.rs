//! pr-triage - autonomous triage for bot-authored pull requests
//!
//! For every open PR of an owner, pr-triage decides whether to merge it,
//! fix its merge conflicts with an AI assistant, ask its author for help,
//! or leave it alone, and reports one outcome per PR.
//!
//! Control flow: [`batch::BatchRunner`] → [`engine::DecisionEngine`] →
//! eligibility → pipeline → conflict resolution or merge.

pub mod ai;
pub mod auth;
pub mod batch;
pub mod config;
pub mod conflict;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod platform;
pub mod types;

pub use error::{Error, Result};
