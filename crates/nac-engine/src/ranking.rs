//! Ranking and confidence estimation

use crate::catalog::CatalogSnapshot;
use crate::scoring::TemplateScore;
use crate::validation::ValidContext;
use nac_model::{
    ConfidenceLevel, ContextAnalysis, EngineConfig, NetworkComplexity, OrganizationSize,
    RecommendationId, ScoreDimension, ScoredRecommendation, Thresholds,
};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Risk note used when nothing could be recommended
pub const NO_MATCH_NOTE: &str = "no templates matched";

/// Number of dimensions reported as primary factors
const PRIMARY_FACTORS: usize = 3;

/// Approach used when organization size or network complexity is unknown
const DEFAULT_APPROACH: &str =
    "Standard phased deployment: monitor mode, low-impact mode, then closed mode";

/// Ordered recommendations plus context-level analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Best first, at most `max_recommendations`
    pub recommendations: Vec<ScoredRecommendation>,
    /// Primary factors, risks and approach
    pub analysis: ContextAnalysis,
    /// Overall confidence in [0, 1]
    pub confidence: f64,
}

/// Orders scored templates and derives confidence
#[derive(Debug, Clone)]
pub struct Ranker {
    thresholds: Thresholds,
    analysis_window: usize,
    max_recommendations: usize,
}

impl Ranker {
    /// Create ranker from engine configuration
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            thresholds: config.thresholds,
            analysis_window: config.analysis_window,
            max_recommendations: config.max_recommendations,
        }
    }

    /// Rank scores produced against `catalog`
    ///
    /// Input order does not affect the output.
    #[must_use]
    pub fn rank(
        &self,
        mut scores: Vec<TemplateScore>,
        context: &ValidContext,
        catalog: &CatalogSnapshot,
    ) -> Ranking {
        let approach = recommended_approach(context.organization_size(), context.network_complexity());

        if scores.is_empty() {
            return Ranking {
                recommendations: Vec::new(),
                analysis: ContextAnalysis {
                    primary_factors: Vec::new(),
                    risk_assessment: vec![NO_MATCH_NOTE.to_string()],
                    recommended_approach: approach.to_string(),
                },
                confidence: 0.0,
            };
        }

        let unmet = |s: &TemplateScore| {
            s.dependencies
                .iter()
                .filter(|d| !catalog.contains(d))
                .count()
        };
        scores.sort_by(|a, b| compare(a, b, unmet(a), unmet(b)));

        let gap = match scores.as_slice() {
            [first, second, ..] => first.score - second.score,
            [only] => only.score,
            [] => 0.0,
        };
        let separation = (gap / self.thresholds.full_separation_gap).min(1.0);
        let confidence = (0.5 * context.completeness() + 0.5 * separation).clamp(0.0, 1.0);

        scores.truncate(self.max_recommendations);
        let window = &scores[..scores.len().min(self.analysis_window)];

        let analysis = ContextAnalysis {
            primary_factors: primary_factors(window),
            risk_assessment: risk_assessment(window),
            recommended_approach: approach.to_string(),
        };

        let recommendations = scores
            .into_iter()
            .map(|s| self.into_recommendation(s))
            .collect();

        Ranking {
            recommendations,
            analysis,
            confidence,
        }
    }

    /// Per-recommendation confidence level
    #[must_use]
    pub fn confidence_level(&self, score: f64, risk_count: usize) -> ConfidenceLevel {
        let t = &self.thresholds;
        if score >= t.high_confidence && risk_count < t.high_confidence_max_risks {
            ConfidenceLevel::High
        } else if score >= t.medium_confidence {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    fn into_recommendation(&self, s: TemplateScore) -> ScoredRecommendation {
        ScoredRecommendation {
            recommendation_id: RecommendationId::new(),
            confidence_level: self.confidence_level(s.score, s.risk_factors.len()),
            template_id: s.template_id,
            score: s.score,
            reasons: s.reasons,
            estimated_complexity: s.complexity,
            estimated_deployment_time: s.deployment_hours,
            customization_level: s.customization_level,
            adaptation_suggestions: s.adaptation_suggestions,
            required_skills: s.required_skills,
            dependencies: s.dependencies,
            risk_factors: s.risk_factors,
            breakdown: s.breakdown,
        }
    }
}

/// Score desc, unmet dependencies asc, hours asc, id asc
fn compare(a: &TemplateScore, b: &TemplateScore, unmet_a: usize, unmet_b: usize) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(unmet_a.cmp(&unmet_b))
        .then(a.deployment_hours.total_cmp(&b.deployment_hours))
        .then_with(|| a.template_id.cmp(&b.template_id))
}

fn primary_factors(window: &[TemplateScore]) -> Vec<String> {
    let mut averages: Vec<(ScoreDimension, f64)> = ScoreDimension::ALL
        .iter()
        .filter_map(|dimension| {
            let subs: Vec<_> = window
                .iter()
                .filter_map(|s| s.sub_score(*dimension))
                .collect();
            // a dimension that was neutral everywhere carried no signal
            if subs.is_empty() || subs.iter().all(|s| s.neutral) {
                return None;
            }
            let average = subs.iter().map(|s| s.contribution).sum::<f64>() / subs.len() as f64;
            (average > 0.0).then_some((*dimension, average))
        })
        .collect();

    // stable sort keeps the fixed dimension order on ties
    averages.sort_by(|a, b| b.1.total_cmp(&a.1));
    averages
        .into_iter()
        .take(PRIMARY_FACTORS)
        .map(|(d, _)| d.label().to_string())
        .collect()
}

fn risk_assessment(window: &[TemplateScore]) -> Vec<String> {
    let mut seen = HashSet::new();
    window
        .iter()
        .flat_map(|s| s.risk_factors.iter())
        .filter(|r| seen.insert(r.as_str()))
        .cloned()
        .collect()
}

/// Narrative rollout approach for an organization profile
#[must_use]
pub fn recommended_approach(
    size: Option<OrganizationSize>,
    complexity: Option<NetworkComplexity>,
) -> &'static str {
    use NetworkComplexity::{Complex, Moderate, Simple, VeryComplex};
    use OrganizationSize::{Enterprise, MidMarket, Smb};

    match (size, complexity) {
        (Some(Enterprise), Some(Complex | VeryComplex)) => {
            "Phased rollout starting with a pilot site, then expanding region by region"
        }
        (Some(Enterprise), Some(Simple | Moderate)) => {
            "Phased rollout by business unit with centralized policy management"
        }
        (Some(MidMarket), Some(Complex | VeryComplex)) => {
            "Pilot at a representative site, then roll out site by site"
        }
        (Some(MidMarket), Some(Simple | Moderate)) => {
            "Staged rollout in monitor mode before enforcing policies"
        }
        (Some(Smb), Some(Complex | VeryComplex)) => {
            "Partner-assisted deployment with a short monitor-mode period"
        }
        (Some(Smb), Some(Simple | Moderate)) => {
            "Direct deployment with a brief validation window"
        }
        _ => DEFAULT_APPROACH,
    }
}
