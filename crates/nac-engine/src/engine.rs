//! Recommendation pipeline
//!
//! `validate -> snapshot -> score (fan-out) -> rank -> plan`. Each arrow is a
//! barrier: a stage starts only after the previous one has fully finished, and
//! cancellation is checked at every barrier.

use crate::catalog::{CatalogSnapshot, CatalogSource, IndexedTemplate};
use crate::planning::StrategyPlanner;
use crate::ranking::Ranker;
use crate::scoring::{Scorer, TemplateScore};
use crate::validation::{validate, ValidContext};
use chrono::Utc;
use nac_model::{
    ConfigError, EngineConfig, EngineError, PipelineStage, RecommendationContext, ResultId,
    ResultMetadata, SmartRecommendationResult,
};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Cooperative cancellation flag shared between a caller and a running call
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create an un-cancelled token
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check if cancellation was requested
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn check(&self, stage: PipelineStage) -> Result<(), EngineError> {
        if self.is_cancelled() {
            tracing::debug!(%stage, "Generation cancelled");
            return Err(EngineError::Cancelled { stage });
        }
        Ok(())
    }
}

/// Stateless recommendation engine over an injected catalog
#[derive(Debug)]
pub struct RecommendationEngine<C> {
    catalog: C,
    config: EngineConfig,
    scorer: Scorer,
    ranker: Ranker,
    planner: StrategyPlanner,
}

impl<C: CatalogSource> RecommendationEngine<C> {
    /// Create engine with validated configuration
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration is invalid
    pub fn new(catalog: C, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(catalog, config))
    }

    /// Create engine with default configuration
    #[must_use]
    pub fn with_defaults(catalog: C) -> Self {
        Self::build(catalog, EngineConfig::default())
    }

    fn build(catalog: C, config: EngineConfig) -> Self {
        Self {
            scorer: Scorer::new(&config),
            ranker: Ranker::new(&config),
            planner: StrategyPlanner::new(config.planning),
            catalog,
            config,
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Injected catalog source
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Generate recommendations for a context
    ///
    /// # Errors
    /// - `EngineError::Validation` if the context is rejected
    /// - `EngineError::Catalog` if no snapshot can be obtained
    pub fn generate(
        &self,
        context: &RecommendationContext,
    ) -> Result<SmartRecommendationResult, EngineError> {
        self.generate_with_cancel(context, &CancellationToken::new())
    }

    /// Generate recommendations, observing a cancellation token
    ///
    /// # Errors
    /// As [`generate`](Self::generate), plus `EngineError::Cancelled` when the
    /// token fires before the result is assembled
    #[tracing::instrument(skip_all)]
    pub fn generate_with_cancel(
        &self,
        context: &RecommendationContext,
        cancel: &CancellationToken,
    ) -> Result<SmartRecommendationResult, EngineError> {
        cancel.check(PipelineStage::Validation)?;
        let valid = validate(context)?;
        let snapshot = self.catalog.snapshot()?;

        cancel.check(PipelineStage::Scoring)?;
        let started = Instant::now();
        let scores = self
            .score_all(&valid, &snapshot, cancel)
            .ok_or(EngineError::Cancelled {
                stage: PipelineStage::Scoring,
            })?;
        tracing::debug!(
            templates = scores.len(),
            elapsed = ?started.elapsed(),
            "Scored catalog"
        );

        cancel.check(PipelineStage::Ranking)?;
        let started = Instant::now();
        let mut ranking = self.ranker.rank(scores, &valid, &snapshot);
        tracing::debug!(
            recommendations = ranking.recommendations.len(),
            confidence = ranking.confidence,
            elapsed = ?started.elapsed(),
            "Ranked recommendations"
        );

        cancel.check(PipelineStage::Planning)?;
        let started = Instant::now();
        let strategy = match self.planner.plan(&ranking.recommendations) {
            Ok(plan) => {
                ranking
                    .analysis
                    .risk_assessment
                    .extend(plan.dropped.iter().map(ToString::to_string));
                plan.strategy
            }
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to an unordered rollout");
                ranking.analysis.risk_assessment.push(format!(
                    "{e}; rollout order could not be determined"
                ));
                self.planner.unordered(&ranking.recommendations)
            }
        };
        tracing::debug!(
            phases = strategy.phases.len(),
            ordered = strategy.ordered,
            elapsed = ?started.elapsed(),
            "Planned rollout"
        );

        let result = SmartRecommendationResult {
            result_id: ResultId::new(),
            context_analysis: ranking.analysis,
            recommendations: ranking.recommendations,
            implementation_strategy: strategy,
            metadata: ResultMetadata {
                confidence: ranking.confidence,
                generated_at: Utc::now(),
                catalog_version: snapshot.version().to_string(),
                catalog_fingerprint: snapshot.fingerprint().to_hex(),
                templates_evaluated: snapshot.len(),
                project_id: valid.project_id().map(str::to_string),
                site_id: valid.site_id().map(str::to_string),
            },
        };

        tracing::info!(
            result_id = %result.result_id,
            catalog = %snapshot.fingerprint().short(),
            recommendations = result.recommendations.len(),
            confidence = result.metadata.confidence,
            "Generated recommendations"
        );
        Ok(result)
    }

    /// Score every template; `None` if cancelled mid-way
    fn score_all(
        &self,
        context: &ValidContext,
        snapshot: &CatalogSnapshot,
        cancel: &CancellationToken,
    ) -> Option<Vec<TemplateScore>> {
        let score = |template: &IndexedTemplate| {
            if cancel.is_cancelled() {
                None
            } else {
                Some(self.scorer.score(context, template))
            }
        };

        if snapshot.len() >= self.config.parallel_threshold {
            snapshot.templates().par_iter().map(score).collect()
        } else {
            snapshot.templates().iter().map(score).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nac_model::{ComplexityLevel, TemplateMetadata};

    fn engine() -> RecommendationEngine<Arc<CatalogSnapshot>> {
        let snapshot = CatalogSnapshot::new(
            "v1",
            vec![TemplateMetadata::new("a", "Cisco", "802.1X", ComplexityLevel::Basic, 8.0)
                .with_use_case("Device Authentication")],
        )
        .unwrap();
        RecommendationEngine::with_defaults(Arc::new(snapshot))
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.max_recommendations = 0;
        let snapshot = Arc::new(CatalogSnapshot::empty());
        assert!(RecommendationEngine::new(snapshot, config).is_err());
    }

    #[test]
    fn cancelled_token_stops_before_validation() {
        let token = CancellationToken::new();
        token.cancel();
        let err = engine()
            .generate_with_cancel(&RecommendationContext::new(), &token)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Cancelled {
                stage: PipelineStage::Validation
            }
        ));
    }

    /// Source that fires the token while handing out its snapshot
    struct CancellingSource {
        snapshot: Arc<CatalogSnapshot>,
        token: CancellationToken,
    }

    impl CatalogSource for CancellingSource {
        fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, nac_model::CatalogError> {
            self.token.cancel();
            Ok(Arc::clone(&self.snapshot))
        }
    }

    #[test]
    fn cancellation_after_snapshot_stops_at_scoring() {
        let token = CancellationToken::new();
        let source = CancellingSource {
            snapshot: Arc::clone(engine().catalog()),
            token: token.clone(),
        };
        let err = RecommendationEngine::with_defaults(source)
            .generate_with_cancel(&RecommendationContext::new().with_vendor("Cisco"), &token)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Cancelled {
                stage: PipelineStage::Scoring
            }
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn cancelled_fan_out_discards_partial_scores() {
        let valid = validate(&RecommendationContext::new().with_vendor("Cisco")).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        for threshold in [0, usize::MAX] {
            let engine = RecommendationEngine::new(
                Arc::clone(engine().catalog()),
                EngineConfig::default().with_parallel_threshold(threshold),
            )
            .unwrap();
            let snapshot = engine.catalog().snapshot().unwrap();
            assert!(engine.score_all(&valid, &snapshot, &token).is_none());
            assert_eq!(
                engine
                    .score_all(&valid, &snapshot, &CancellationToken::new())
                    .map(|s| s.len()),
                Some(1)
            );
        }
    }

    #[test]
    fn metadata_describes_snapshot() {
        let engine = engine();
        let result = engine
            .generate(&RecommendationContext::new().with_vendor("Cisco"))
            .unwrap();
        assert_eq!(result.metadata.catalog_version, "v1");
        assert_eq!(result.metadata.templates_evaluated, 1);
        assert_eq!(result.metadata.catalog_fingerprint.len(), 64);
        assert_eq!(
            result.metadata.catalog_fingerprint,
            engine.catalog().fingerprint().to_hex()
        );
    }
}
