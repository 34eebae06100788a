//! Template scoring
//!
//! Each template is scored against a validated context as a weighted sum of
//! five independent criteria, each in [0, 1]:
//!
//! | criterion           | default weight | neutral when                          |
//! |---------------------|----------------|---------------------------------------|
//! | vendor affinity     | 0.20           | no existing vendors / agnostic vendor |
//! | use-case coverage   | 0.25           | never                                 |
//! | compliance coverage | 0.20           | no frameworks required                |
//! | complexity fit      | 0.20           | no complexity or expertise declared   |
//! | timeline fit        | 0.15           | no timeline declared                  |
//!
//! Scoring reads only the context, the template and the configuration, so
//! templates can be scored in any order or concurrently.

use crate::catalog::IndexedTemplate;
use crate::validation::ValidContext;
use nac_model::{
    ComplexityLevel, CustomizationLevel, EngineConfig, ScoreDimension, ScoringWeights, SubScore,
    TemplateId, Thresholds, TimelineCeilings,
};
use std::collections::BTreeSet;

/// Timeline fit never decays below this
const TIMELINE_FLOOR: f64 = 0.1;

/// Evidence produced for a single template
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateScore {
    /// Scored template
    pub template_id: TemplateId,
    /// Weighted score in [0, 1]
    pub score: f64,
    /// Sub-scores in fixed dimension order
    pub breakdown: Vec<SubScore>,
    /// Strong criteria, strongest contribution first
    pub reasons: Vec<String>,
    /// Weak criteria, weakest first
    pub risk_factors: Vec<String>,
    /// Template difficulty
    pub complexity: ComplexityLevel,
    /// Typical deployment effort in hours
    pub deployment_hours: f64,
    /// Declared dependencies
    pub dependencies: Vec<TemplateId>,
    /// Adaptation effort
    pub customization_level: CustomizationLevel,
    /// Concrete adaptation steps
    pub adaptation_suggestions: Vec<String>,
    /// Skills the template needs
    pub required_skills: Vec<String>,
}

impl TemplateScore {
    /// Sub-score for one criterion
    #[must_use]
    pub fn sub_score(&self, dimension: ScoreDimension) -> Option<&SubScore> {
        self.breakdown.iter().find(|s| s.dimension == dimension)
    }
}

/// Raw criterion value with its rendered explanation
#[derive(Debug, Clone)]
struct Criterion {
    dimension: ScoreDimension,
    value: f64,
    neutral: bool,
    strength: String,
    weakness: String,
}

/// Pure scorer over a fixed configuration
#[derive(Debug, Clone)]
pub struct Scorer {
    weights: ScoringWeights,
    thresholds: Thresholds,
    timeline: TimelineCeilings,
}

impl Scorer {
    /// Create scorer from engine configuration
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            weights: config.weights,
            thresholds: config.thresholds,
            timeline: config.timeline,
        }
    }

    /// Score one template against a validated context
    #[must_use]
    pub fn score(&self, context: &ValidContext, template: &IndexedTemplate) -> TemplateScore {
        let criteria = [
            vendor_affinity(context, template),
            use_case_coverage(context, template),
            compliance_coverage(context, template),
            complexity_fit(context, template),
            self.timeline_fit(context, template),
        ];

        let breakdown: Vec<SubScore> = criteria
            .iter()
            .map(|c| SubScore {
                dimension: c.dimension,
                value: c.value,
                contribution: c.value * self.weights.weight(c.dimension),
                neutral: c.neutral,
            })
            .collect();

        let score = breakdown
            .iter()
            .map(|s| s.contribution)
            .sum::<f64>()
            .clamp(0.0, 1.0);

        let customization_level = customization_level(&criteria[1], &criteria[2]);

        TemplateScore {
            template_id: template.id().clone(),
            score,
            reasons: self.reasons(&criteria, &breakdown),
            risk_factors: self.risk_factors(&criteria),
            breakdown,
            complexity: template.metadata().complexity_level,
            deployment_hours: template.metadata().typical_deployment_hours,
            dependencies: template.metadata().dependencies.clone(),
            customization_level,
            adaptation_suggestions: adaptation_suggestions(context, template),
            required_skills: required_skills(template),
        }
    }

    fn reasons(&self, criteria: &[Criterion], breakdown: &[SubScore]) -> Vec<String> {
        let mut strong: Vec<(usize, f64)> = criteria
            .iter()
            .enumerate()
            .filter(|(_, c)| c.value > self.thresholds.reason)
            .map(|(i, _)| (i, breakdown[i].contribution))
            .collect();

        strong.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        strong
            .into_iter()
            .map(|(i, _)| criteria[i].strength.clone())
            .collect()
    }

    fn risk_factors(&self, criteria: &[Criterion]) -> Vec<String> {
        let mut weak: Vec<(usize, f64)> = criteria
            .iter()
            .enumerate()
            .filter(|(_, c)| c.value < self.thresholds.risk)
            .map(|(i, c)| (i, c.value))
            .collect();

        weak.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        weak.into_iter()
            .map(|(i, _)| criteria[i].weakness.clone())
            .collect()
    }

    fn timeline_fit(&self, context: &ValidContext, template: &IndexedTemplate) -> Criterion {
        let hours = template.metadata().typical_deployment_hours;
        let Some(tier) = context.timeline() else {
            return Criterion {
                dimension: ScoreDimension::TimelineFit,
                value: 1.0,
                neutral: true,
                strength: "No timeline constraints to meet".to_string(),
                weakness: String::new(),
            };
        };

        let ceiling = self.timeline.ceiling(tier);
        let value = if hours <= ceiling {
            1.0
        } else {
            (1.0 - (hours - ceiling) / ceiling).max(TIMELINE_FLOOR)
        };

        Criterion {
            dimension: ScoreDimension::TimelineFit,
            value,
            neutral: false,
            strength: format!("Typical deployment of {hours}h fits the {tier} timeline"),
            weakness: format!(
                "Typical deployment of {hours}h exceeds the {tier} timeline ceiling of {ceiling}h"
            ),
        }
    }
}

fn ratio(matched: usize, requested: usize) -> f64 {
    matched as f64 / requested.max(1) as f64
}

fn vendor_affinity(context: &ValidContext, template: &IndexedTemplate) -> Criterion {
    let vendor = &template.metadata().vendor;
    let existing = context.existing_vendors();

    if template.is_vendor_agnostic() || existing.is_empty() {
        let strength = if template.is_vendor_agnostic() {
            "Vendor-agnostic template fits any existing estate".to_string()
        } else {
            "No existing vendor estate to align with".to_string()
        };
        return Criterion {
            dimension: ScoreDimension::VendorAffinity,
            value: 1.0,
            neutral: true,
            strength,
            weakness: String::new(),
        };
    }

    let matched = existing
        .iter()
        .filter(|v| template.match_tags().contains(*v))
        .count();

    Criterion {
        dimension: ScoreDimension::VendorAffinity,
        value: ratio(matched, existing.len()),
        neutral: false,
        strength: format!("Aligns with the existing {vendor} deployment"),
        weakness: format!("{vendor} is not part of the existing vendor estate"),
    }
}

fn use_case_coverage(context: &ValidContext, template: &IndexedTemplate) -> Criterion {
    let requested = context.use_cases();
    let matched = requested
        .iter()
        .filter(|u| template.use_cases().contains(*u))
        .count();

    let weakness = if requested.is_empty() {
        "No use cases were requested to match against".to_string()
    } else {
        format!(
            "Covers {matched} of {} requested use cases",
            requested.len()
        )
    };

    Criterion {
        dimension: ScoreDimension::UseCaseCoverage,
        value: ratio(matched, requested.len()),
        neutral: false,
        strength: format!(
            "Covers {matched} of {} requested use cases",
            requested.len()
        ),
        weakness,
    }
}

fn compliance_coverage(context: &ValidContext, template: &IndexedTemplate) -> Criterion {
    let required = context.compliance_frameworks();
    if required.is_empty() {
        return Criterion {
            dimension: ScoreDimension::ComplianceCoverage,
            value: 1.0,
            neutral: true,
            strength: "No compliance frameworks required".to_string(),
            weakness: String::new(),
        };
    }

    let missing: Vec<&str> = required
        .iter()
        .filter(|f| !template.compliance().contains(*f))
        .map(String::as_str)
        .collect();
    let matched = required.len() - missing.len();

    Criterion {
        dimension: ScoreDimension::ComplianceCoverage,
        value: ratio(matched, required.len()),
        neutral: false,
        strength: format!(
            "Covers {matched} of {} required compliance frameworks",
            required.len()
        ),
        weakness: format!("Missing compliance coverage for {}", missing.join(", ")),
    }
}

/// 0 steps = 1.0, 1 step = 0.6, 2 or more = 0.2
fn step_fit(template: u8, target: u8) -> f64 {
    match template.abs_diff(target) {
        0 => 1.0,
        1 => 0.6,
        _ => 0.2,
    }
}

fn complexity_fit(context: &ValidContext, template: &IndexedTemplate) -> Criterion {
    let level = template.metadata().complexity_level;
    let targets: Vec<(&str, u8)> = [
        context
            .network_complexity()
            .map(|c| ("network complexity", c.step())),
        context.expertise().map(|e| ("team expertise", e.step())),
    ]
    .into_iter()
    .flatten()
    .collect();

    if targets.is_empty() {
        return Criterion {
            dimension: ScoreDimension::ComplexityFit,
            value: 1.0,
            neutral: true,
            strength: "No complexity or expertise constraints declared".to_string(),
            weakness: String::new(),
        };
    }

    let value = targets
        .iter()
        .map(|(_, target)| step_fit(level.step(), *target))
        .sum::<f64>()
        / targets.len() as f64;

    let mismatched: Vec<&str> = targets
        .iter()
        .filter(|(_, target)| *target != level.step())
        .map(|(name, _)| *name)
        .collect();

    Criterion {
        dimension: ScoreDimension::ComplexityFit,
        value,
        neutral: false,
        strength: format!("{level} complexity matches the environment and team"),
        weakness: format!("{level} complexity is mismatched with {}", mismatched.join(" and ")),
    }
}

fn customization_level(use_cases: &Criterion, compliance: &Criterion) -> CustomizationLevel {
    let fit = (use_cases.value + compliance.value) / 2.0;
    if fit >= 0.8 {
        CustomizationLevel::Minimal
    } else if fit >= 0.5 {
        CustomizationLevel::Moderate
    } else {
        CustomizationLevel::Extensive
    }
}

fn adaptation_suggestions(context: &ValidContext, template: &IndexedTemplate) -> Vec<String> {
    let mut suggestions: Vec<String> = context
        .use_cases()
        .iter()
        .filter(|u| !template.use_cases().contains(*u))
        .map(|u| format!("Extend the policy set to cover the `{u}` use case"))
        .collect();

    suggestions.extend(
        context
            .compliance_frameworks()
            .iter()
            .filter(|f| !template.compliance().contains(*f))
            .map(|f| format!("Add controls and reporting for {f}")),
    );

    let existing = context.existing_vendors();
    if !template.is_vendor_agnostic()
        && !existing.is_empty()
        && !existing.contains(template.vendor_key())
    {
        let estate = existing.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
        suggestions.push(format!(
            "Plan {} integration alongside the existing {estate} estate",
            template.metadata().vendor
        ));
    }

    let level = template.metadata().complexity_level;
    if let Some(expertise) = context.expertise() {
        if level.step() > expertise.step() {
            suggestions.push(format!(
                "Schedule {level}-level training or partner support for a {expertise} team"
            ));
        }
    }

    suggestions
}

fn required_skills(template: &IndexedTemplate) -> Vec<String> {
    let metadata = template.metadata();
    let mut derived = metadata.required_skills.clone();

    if template.is_vendor_agnostic() {
        derived.push("multi-vendor integration".to_string());
    } else {
        derived.push(format!("{} administration", metadata.vendor.trim()));
    }
    derived.push(format!("{} configuration", metadata.category.trim()));
    if matches!(
        metadata.complexity_level,
        ComplexityLevel::Advanced | ComplexityLevel::Expert
    ) {
        derived.push("network architecture".to_string());
    }
    if !metadata.compliance_coverage.is_empty() {
        derived.push("compliance auditing".to_string());
    }

    let mut seen = BTreeSet::new();
    derived
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .filter(|s| seen.insert(s.trim().to_lowercase()))
        .collect()
}
