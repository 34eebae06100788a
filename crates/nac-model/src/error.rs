//! Error types for the NAC template advisor
//!
//! Provides the error taxonomy for:
//! - Context validation failures (caller errors, never retried)
//! - Planning failures (catalog data defects, degraded locally)
//! - Catalog loading and snapshot integrity
//! - Feedback referencing unknown recommendations
//! - Configuration loading and validation

use crate::types::{PipelineStage, RecommendationId, TemplateId};

/// Main engine error type
///
/// Only these variants escape `generate`; planning failures are absorbed
/// into a degraded strategy.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Input context rejected before scoring
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Catalog snapshot could not be obtained
    #[error("catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),

    /// Caller cancelled the call at a stage barrier
    #[error("generation cancelled during {stage}")]
    Cancelled {
        /// Stage that observed the cancellation
        stage: PipelineStage,
    },
}

impl EngineError {
    /// Check if the caller must correct its input
    #[inline]
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if retrying the same call may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Catalog(CatalogError::Io { .. }))
    }
}

/// Rejected recommendation context
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// Offending field (camelCase wire name, or `context` for whole-input failures)
    pub field: String,
    /// Human-readable reason
    pub reason: String,
}

impl ValidationError {
    /// Create a validation error for a field
    #[inline]
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Context carries no industry, use-case or vendor signal
    #[inline]
    #[must_use]
    pub fn missing_signal() -> Self {
        Self::new(
            "context",
            "at least one of industry, useCases or existingVendors is required",
        )
    }
}

/// Strategy planning errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanningError {
    /// Selected templates depend on each other in a loop
    #[error("cyclic dependency between templates: {}", join_ids(.involved_templates))]
    CyclicDependency {
        /// Templates taking part in at least one cycle, sorted
        involved_templates: Vec<TemplateId>,
    },
}

impl PlanningError {
    /// Templates involved in the failure
    #[must_use]
    pub fn involved_templates(&self) -> &[TemplateId] {
        match self {
            Self::CyclicDependency { involved_templates } => involved_templates,
        }
    }
}

fn join_ids(ids: &[TemplateId]) -> String {
    ids.iter()
        .map(TemplateId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Feedback referenced a recommendation that is not (or no longer) tracked
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("recommendation not found: {recommendation_id}")]
pub struct NotFoundError {
    /// The unknown id
    pub recommendation_id: RecommendationId,
}

/// Catalog loading and snapshot errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Reading the catalog source failed
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Source path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid JSON document
    #[error("invalid catalog JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Invalid YAML document
    #[error("invalid catalog YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// File extension not recognised
    #[error("unsupported catalog format: {0}")]
    UnsupportedFormat(String),

    /// Two templates share an id
    #[error("duplicate template id: {0}")]
    DuplicateTemplate(TemplateId),

    /// Template id is blank
    #[error("template with empty id")]
    EmptyTemplateId,

    /// Deployment hours negative or not finite
    #[error("template {template} has invalid typicalDeploymentHours {hours}")]
    InvalidHours {
        /// Offending template
        template: TemplateId,
        /// Declared hours
        hours: f64,
    },
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the config file failed
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Source path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML document
    #[error("invalid TOML config: {0}")]
    InvalidToml(#[from] toml::de::Error),

    /// Invalid YAML document
    #[error("invalid YAML config: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// File extension not recognised
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// Scoring weights out of range or not summing to 1.0
    #[error("invalid scoring weights: {0}")]
    InvalidWeights(String),

    /// Any other out-of-range setting
    #[error("invalid setting {name}: {reason}")]
    InvalidSetting {
        /// Setting name
        name: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Feedback / usage sink errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum SinkError {
    /// Sink refused or failed to store the record
    #[error("sink write failed: {0}")]
    WriteFailed(String),

    /// Sink is shut down
    #[error("sink closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = ValidationError::new("organizationSize", "unknown value `huge`");
        assert_eq!(err.to_string(), "invalid organizationSize: unknown value `huge`");
    }

    #[test]
    fn missing_signal_targets_context() {
        assert_eq!(ValidationError::missing_signal().field, "context");
    }

    #[test]
    fn cycle_lists_templates() {
        let err = PlanningError::CyclicDependency {
            involved_templates: vec![TemplateId::new("a"), TemplateId::new("b")],
        };
        assert_eq!(err.to_string(), "cyclic dependency between templates: a, b");
        assert_eq!(err.involved_templates().len(), 2);
    }

    #[test]
    fn engine_error_classification() {
        let validation = EngineError::from(ValidationError::missing_signal());
        assert!(validation.is_caller_error());
        assert!(!validation.is_retryable());

        let io = EngineError::from(CatalogError::Io {
            path: "catalog.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        });
        assert!(io.is_retryable());
        assert!(!io.is_caller_error());

        let cancelled = EngineError::Cancelled {
            stage: PipelineStage::Scoring,
        };
        assert!(!cancelled.is_retryable());
        assert_eq!(cancelled.to_string(), "generation cancelled during scoring");
    }
}
