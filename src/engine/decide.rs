//! The per-PR state machine

use super::plan::{MergeabilityRoute, PipelineRoute, route_by_mergeability, route_by_pipeline};
use crate::ai::AiAssistant;
use crate::config::TriageConfig;
use crate::conflict::{AutonomousResolver, ConflictResolutionStrategy, GitRunner, NotifyOnly};
use crate::eligibility::{EligibilityPolicy, TrustedAuthorPolicy};
use crate::merge::MergeExecutor;
use crate::pipeline::{PipelineEvaluator, SoftFailMatcher};
use crate::platform::PlatformService;
use crate::types::{ProcessingOutcome, PullRequestCandidate};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Sequences eligibility, mergeability, pipeline and execution into exactly
/// one outcome per PR
pub struct DecisionEngine {
    eligibility: Arc<dyn EligibilityPolicy>,
    pipeline: PipelineEvaluator,
    resolver: Arc<dyn ConflictResolutionStrategy>,
    executor: MergeExecutor,
}

impl DecisionEngine {
    /// Assemble an engine from its parts
    pub fn new(
        eligibility: Arc<dyn EligibilityPolicy>,
        pipeline: PipelineEvaluator,
        resolver: Arc<dyn ConflictResolutionStrategy>,
        executor: MergeExecutor,
    ) -> Self {
        Self {
            eligibility,
            pipeline,
            resolver,
            executor,
        }
    }

    /// Build the production engine described by `config`
    pub fn from_config(
        config: &TriageConfig,
        platform: Arc<dyn PlatformService>,
        ai: Arc<dyn AiAssistant>,
        git: Arc<dyn GitRunner>,
        token: &str,
    ) -> Self {
        let eligibility = Arc::new(TrustedAuthorPolicy::new(
            config.trusted_authors.iter().cloned(),
            config.min_pr_age(),
        ));
        let pipeline = PipelineEvaluator::new(
            platform.clone(),
            SoftFailMatcher::new(&config.soft_fail_patterns),
        );
        let resolver: Arc<dyn ConflictResolutionStrategy> = if config.auto_resolve_conflicts {
            Arc::new(AutonomousResolver::new(
                git,
                ai.clone(),
                token,
                config.bot.clone(),
                config.ai.timeout(),
            ))
        } else {
            Arc::new(NotifyOnly)
        };
        let executor = MergeExecutor::new(
            platform,
            ai,
            config.merge_method,
            config.merge_label.clone(),
        );
        Self::new(eligibility, pipeline, resolver, executor)
    }

    /// Decide and act on one PR snapshot
    pub async fn process(
        &self,
        candidate: &PullRequestCandidate,
        now: DateTime<Utc>,
    ) -> ProcessingOutcome {
        if let Err(reason) = self.eligibility.check(candidate, now) {
            debug!(%reason, author = %candidate.author, "not eligible");
            return ProcessingOutcome::Skipped(reason);
        }

        match route_by_mergeability(candidate.mergeable_state) {
            MergeabilityRoute::Skip(reason) => ProcessingOutcome::Skipped(reason),
            MergeabilityRoute::ResolveConflicts => self.handle_conflicts(candidate).await,
            MergeabilityRoute::CheckPipeline => {
                let status = self.pipeline.evaluate(candidate).await;
                let route = route_by_pipeline(&status);
                info!(outcome = ?status.outcome, %route, "pipeline evaluated");
                match route {
                    PipelineRoute::Merge => self.executor.merge(candidate).await,
                    PipelineRoute::ReportFailure => {
                        self.executor
                            .report_pipeline_failure(candidate, &status)
                            .await
                    }
                    PipelineRoute::Skip(reason) => ProcessingOutcome::Skipped(reason),
                }
            }
        }
    }

    async fn handle_conflicts(&self, candidate: &PullRequestCandidate) -> ProcessingOutcome {
        info!("PR has conflicts");
        if self.resolver.resolve(candidate).await {
            return ProcessingOutcome::ConflictsResolved;
        }
        self.executor.notify_conflicts(candidate).await
    }
}
