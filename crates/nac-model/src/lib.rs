//! NAC Model - shared vocabulary of the template advisor
//!
//! Types consumed and produced by the recommendation engine:
//! - [`RecommendationContext`]: the caller's description of an organization
//! - [`TemplateMetadata`]: catalog entries, read-only for the engine
//! - [`SmartRecommendationResult`]: ranked recommendations, analysis and plan
//! - [`EngineConfig`]: tunable weights, thresholds and planning constants
//! - Error taxonomy in [`error`]
//!
//! # Example
//!
//! ```rust
//! use nac_model::{EngineConfig, RecommendationContext};
//!
//! let config = EngineConfig::new().with_max_recommendations(5);
//! assert!(config.validate().is_ok());
//!
//! let context = RecommendationContext::new()
//!     .with_vendor("Cisco")
//!     .with_use_case("Device Authentication")
//!     .with_network_complexity("Moderate");
//! assert_eq!(context.existing_vendors.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod context;
pub mod error;
pub mod result;
pub mod template;
pub mod types;

// Re-exports for convenience
pub use config::{EngineConfig, PlanningConfig, ScoringWeights, Thresholds, TimelineCeilings};
pub use context::RecommendationContext;
pub use error::{
    CatalogError, ConfigError, EngineError, NotFoundError, PlanningError, SinkError,
    ValidationError,
};
pub use result::{
    Ack, ContextAnalysis, FeedbackRecord, ImplementationPhase, ImplementationStrategy,
    ResultMetadata, ScoredRecommendation, SmartRecommendationResult, SubScore, UsageRecord,
};
pub use template::TemplateMetadata;
pub use types::{
    ComplexityLevel, ConfidenceLevel, CustomizationLevel, ExpertiseLevel, NetworkComplexity,
    OrganizationSize, PipelineStage, RecommendationId, ResultId, ScoreDimension, TemplateId,
    TimelineTier, UnknownVariant,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
