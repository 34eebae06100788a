//! NAC Engine - template scoring, ranking and rollout planning
//!
//! Turns a [`RecommendationContext`](nac_model::RecommendationContext) and a
//! catalog snapshot into a [`SmartRecommendationResult`](nac_model::SmartRecommendationResult):
//! - [`validation`]: normalize and check the caller's context
//! - [`catalog`]: immutable, fingerprinted catalog snapshots
//! - [`scoring`]: weighted five-criterion template scoring
//! - [`ranking`]: deterministic ordering, confidence and context analysis
//! - [`planning`]: dependency-aware phased rollout
//! - [`feedback`]: usage and feedback recording
//!
//! # Example
//!
//! ```rust
//! use nac_engine::{CatalogSnapshot, RecommendationEngine};
//! use nac_model::{ComplexityLevel, RecommendationContext, TemplateMetadata};
//! use std::sync::Arc;
//!
//! let catalog = CatalogSnapshot::new(
//!     "2024.1",
//!     vec![TemplateMetadata::new("ise-dot1x", "Cisco", "802.1X", ComplexityLevel::Intermediate, 40.0)
//!         .with_use_case("Device Authentication")],
//! )?;
//! let engine = RecommendationEngine::with_defaults(Arc::new(catalog));
//!
//! let context = RecommendationContext::new()
//!     .with_vendor("Cisco")
//!     .with_use_case("Device Authentication");
//! let result = engine.generate(&context)?;
//! assert_eq!(result.top().map(|r| r.template_id.as_str()), Some("ise-dot1x"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod engine;
pub mod feedback;
pub mod fingerprint;
pub mod planning;
pub mod ranking;
pub mod scoring;
pub mod validation;

// Re-exports for convenience
pub use catalog::{CatalogSnapshot, CatalogSource, IndexedTemplate, SharedCatalog};
pub use engine::{CancellationToken, RecommendationEngine};
pub use feedback::{FeedbackGateway, FeedbackSink, InMemorySink};
pub use fingerprint::SnapshotFingerprint;
pub use planning::{DroppedDependency, Plan, StrategyPlanner};
pub use ranking::{Ranker, Ranking};
pub use scoring::{Scorer, TemplateScore};
pub use validation::{validate, ValidContext};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
