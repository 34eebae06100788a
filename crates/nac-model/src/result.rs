//! Engine output types
//!
//! Everything here is created fresh per call and never mutated afterwards.

use crate::types::{
    ComplexityLevel, ConfidenceLevel, CustomizationLevel, RecommendationId, ResultId,
    ScoreDimension, TemplateId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scoring criterion's raw value and its weighted contribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubScore {
    /// Criterion
    pub dimension: ScoreDimension,
    /// Raw value in [0, 1]
    pub value: f64,
    /// `value * weight`
    pub contribution: f64,
    /// True when the context declared nothing for this criterion
    pub neutral: bool,
}

/// A template ranked against a context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecommendation {
    /// Id used to correlate feedback
    pub recommendation_id: RecommendationId,
    /// Recommended template
    pub template_id: TemplateId,
    /// Weighted score in [0, 1]
    pub score: f64,
    /// Derived confidence
    pub confidence_level: ConfidenceLevel,
    /// Strong criteria, strongest first
    pub reasons: Vec<String>,
    /// Template difficulty
    pub estimated_complexity: ComplexityLevel,
    /// Deployment effort in hours
    pub estimated_deployment_time: f64,
    /// Adaptation effort
    pub customization_level: CustomizationLevel,
    /// Concrete adaptation steps
    pub adaptation_suggestions: Vec<String>,
    /// Skills the rollout needs
    pub required_skills: Vec<String>,
    /// Templates to apply first
    pub dependencies: Vec<TemplateId>,
    /// Weak criteria
    pub risk_factors: Vec<String>,
    /// Per-criterion evidence
    pub breakdown: Vec<SubScore>,
}

impl ScoredRecommendation {
    /// Weighted contribution of one criterion
    #[must_use]
    pub fn contribution(&self, dimension: ScoreDimension) -> f64 {
        self.breakdown
            .iter()
            .find(|s| s.dimension == dimension)
            .map_or(0.0, |s| s.contribution)
    }
}

/// Context-level reading of the ranking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextAnalysis {
    /// Criteria driving the top recommendations
    pub primary_factors: Vec<String>,
    /// Distinct risks across the top recommendations
    pub risk_assessment: Vec<String>,
    /// Narrative rollout approach
    pub recommended_approach: String,
}

/// A set of templates that can be applied concurrently
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationPhase {
    /// Phase name
    pub name: String,
    /// Duration in whole weeks
    pub duration_weeks: u32,
    /// Templates in rank order
    pub templates: Vec<TemplateId>,
    /// Names of phases that must finish first
    pub dependencies: Vec<String>,
}

/// Phased rollout plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationStrategy {
    /// Timeline along the critical path
    pub total_timeline_weeks: u32,
    /// Phases in execution order
    pub phases: Vec<ImplementationPhase>,
    /// Longest duration-weighted dependency chain
    pub critical_path: Vec<TemplateId>,
    /// Skills, most frequently needed first
    pub resource_requirements: Vec<String>,
    /// False when the plan fell back to a single unordered phase
    pub ordered: bool,
}

/// Provenance and confidence of a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    /// Overall confidence in [0, 1]
    pub confidence: f64,
    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
    /// Catalog snapshot version
    pub catalog_version: String,
    /// Catalog snapshot fingerprint (hex)
    pub catalog_fingerprint: String,
    /// Number of templates scored
    pub templates_evaluated: usize,
    /// Caller provenance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Caller provenance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
}

/// Complete engine output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartRecommendationResult {
    /// Result id
    pub result_id: ResultId,
    /// Context-level analysis
    pub context_analysis: ContextAnalysis,
    /// Recommendations, best first
    pub recommendations: Vec<ScoredRecommendation>,
    /// Rollout plan
    pub implementation_strategy: ImplementationStrategy,
    /// Confidence and provenance
    pub metadata: ResultMetadata,
}

impl SmartRecommendationResult {
    /// Best recommendation, if any
    #[inline]
    #[must_use]
    pub fn top(&self) -> Option<&ScoredRecommendation> {
        self.recommendations.first()
    }

    /// Find a recommendation by id
    #[must_use]
    pub fn recommendation(&self, id: RecommendationId) -> Option<&ScoredRecommendation> {
        self.recommendations.iter().find(|r| r.recommendation_id == id)
    }
}

/// A template applied by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// Applied template
    pub template_id: TemplateId,
    /// Recommendation it came from, if any
    #[serde(default)]
    pub recommendation_id: Option<RecommendationId>,
    /// Caller provenance
    #[serde(default)]
    pub project_id: Option<String>,
    /// Free-form outcome data
    #[serde(default)]
    pub outcome: serde_json::Value,
    /// When it was applied
    pub recorded_at: DateTime<Utc>,
}

impl UsageRecord {
    /// Create usage record stamped now
    #[must_use]
    pub fn new(template_id: impl Into<TemplateId>) -> Self {
        Self {
            template_id: template_id.into(),
            recommendation_id: None,
            project_id: None,
            outcome: serde_json::Value::Null,
            recorded_at: Utc::now(),
        }
    }

    /// With originating recommendation
    #[inline]
    #[must_use]
    pub fn with_recommendation(mut self, id: RecommendationId) -> Self {
        self.recommendation_id = Some(id);
        self
    }

    /// With outcome data
    #[inline]
    #[must_use]
    pub fn with_outcome(mut self, outcome: serde_json::Value) -> Self {
        self.outcome = outcome;
        self
    }
}

/// User feedback on a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    /// Recommendation being rated
    pub recommendation_id: RecommendationId,
    /// Template it recommended
    pub template_id: TemplateId,
    /// Free-form feedback payload
    pub feedback: serde_json::Value,
    /// When it was submitted
    pub submitted_at: DateTime<Utc>,
}

/// Sink acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ack {
    /// Record handed to the sink
    Accepted,
    /// Sink failed; the failure was logged and dropped
    Dropped,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recommendation() -> ScoredRecommendation {
        ScoredRecommendation {
            recommendation_id: RecommendationId::new(),
            template_id: TemplateId::new("t1"),
            score: 0.9,
            confidence_level: ConfidenceLevel::High,
            reasons: vec![],
            estimated_complexity: ComplexityLevel::Basic,
            estimated_deployment_time: 8.0,
            customization_level: CustomizationLevel::Minimal,
            adaptation_suggestions: vec![],
            required_skills: vec![],
            dependencies: vec![],
            risk_factors: vec![],
            breakdown: vec![SubScore {
                dimension: ScoreDimension::UseCaseCoverage,
                value: 1.0,
                contribution: 0.25,
                neutral: false,
            }],
        }
    }

    #[test]
    fn contribution_lookup() {
        let rec = recommendation();
        assert!((rec.contribution(ScoreDimension::UseCaseCoverage) - 0.25).abs() < f64::EPSILON);
        assert!(rec.contribution(ScoreDimension::TimelineFit).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(recommendation()).unwrap();
        assert!(json.get("templateId").is_some());
        assert_eq!(json["confidenceLevel"], "high");
        assert_eq!(json["breakdown"][0]["dimension"], "useCaseCoverage");
    }

    #[test]
    fn usage_record_builder() {
        let id = RecommendationId::new();
        let usage = UsageRecord::new("t1")
            .with_recommendation(id)
            .with_outcome(serde_json::json!({"applied": true}));
        assert_eq!(usage.recommendation_id, Some(id));
        assert_eq!(usage.outcome["applied"], true);
    }
}
