//! CLI commands

pub mod auth;
pub mod context;
pub mod run;
pub mod style;

pub use auth::run_auth;
pub use context::Overrides;
pub use run::run_triage;
