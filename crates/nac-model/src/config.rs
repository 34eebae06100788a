//! Engine configuration
//!
//! All scoring weights, thresholds and planning constants are tunable.
//! Defaults reproduce the documented behaviour; `validate` rejects
//! combinations that would break score bounds.

use crate::error::ConfigError;
use crate::types::{ScoreDimension, TimelineTier};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Weights of the five scoring criteria; must sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Vendor affinity
    pub vendor_affinity: f64,
    /// Use-case coverage
    pub use_case_coverage: f64,
    /// Compliance coverage
    pub compliance_coverage: f64,
    /// Complexity fit
    pub complexity_fit: f64,
    /// Timeline fit
    pub timeline_fit: f64,
}

impl ScoringWeights {
    const SUM_TOLERANCE: f64 = 1e-6;

    /// Weight of one criterion
    #[inline]
    #[must_use]
    pub fn weight(&self, dimension: ScoreDimension) -> f64 {
        match dimension {
            ScoreDimension::VendorAffinity => self.vendor_affinity,
            ScoreDimension::UseCaseCoverage => self.use_case_coverage,
            ScoreDimension::ComplianceCoverage => self.compliance_coverage,
            ScoreDimension::ComplexityFit => self.complexity_fit,
            ScoreDimension::TimelineFit => self.timeline_fit,
        }
    }

    /// Sum of all weights
    #[must_use]
    pub fn total(&self) -> f64 {
        ScoreDimension::ALL.iter().map(|d| self.weight(*d)).sum()
    }

    /// Check each weight is in [0, 1] and the total is 1.0
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidWeights` describing the first problem
    pub fn validate(&self) -> Result<(), ConfigError> {
        for dimension in ScoreDimension::ALL {
            let w = self.weight(dimension);
            if !(0.0..=1.0).contains(&w) {
                return Err(ConfigError::InvalidWeights(format!(
                    "{dimension} weight {w} is outside [0, 1]"
                )));
            }
        }

        let total = self.total();
        if (total - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(ConfigError::InvalidWeights(format!(
                "weights sum to {total}, expected 1.0"
            )));
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            vendor_affinity: 0.20,
            use_case_coverage: 0.25,
            compliance_coverage: 0.20,
            complexity_fit: 0.20,
            timeline_fit: 0.15,
        }
    }
}

/// Hour ceilings per timeline tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineCeilings {
    /// Urgent
    pub urgent_hours: f64,
    /// Fast
    pub fast_hours: f64,
    /// Normal
    pub normal_hours: f64,
    /// Extended
    pub extended_hours: f64,
}

impl TimelineCeilings {
    /// Ceiling for a tier
    #[inline]
    #[must_use]
    pub fn ceiling(&self, tier: TimelineTier) -> f64 {
        match tier {
            TimelineTier::Urgent => self.urgent_hours,
            TimelineTier::Fast => self.fast_hours,
            TimelineTier::Normal => self.normal_hours,
            TimelineTier::Extended => self.extended_hours,
        }
    }
}

impl Default for TimelineCeilings {
    fn default() -> Self {
        Self {
            urgent_hours: 40.0,
            fast_hours: 120.0,
            normal_hours: 320.0,
            extended_hours: 960.0,
        }
    }
}

/// Thresholds turning sub-scores into reasons/risks and scores into confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Sub-scores above this become reasons
    pub reason: f64,
    /// Sub-scores below this become risk factors
    pub risk: f64,
    /// Minimum score for high confidence
    pub high_confidence: f64,
    /// High confidence requires fewer risk factors than this
    pub high_confidence_max_risks: usize,
    /// Minimum score for medium confidence
    pub medium_confidence: f64,
    /// Score gap that maps to full separation confidence
    pub full_separation_gap: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            reason: 0.7,
            risk: 0.4,
            high_confidence: 0.8,
            high_confidence_max_risks: 2,
            medium_confidence: 0.55,
            full_separation_gap: 0.25,
        }
    }
}

/// Strategy planning constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Number of top recommendations planned
    pub plan_size: usize,
    /// Buffer added to each phase, as a fraction
    pub phase_buffer: f64,
    /// Working hours per week
    pub hours_per_week: f64,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            plan_size: 8,
            phase_buffer: 0.2,
            hours_per_week: 40.0,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scoring weights
    pub weights: ScoringWeights,
    /// Reason, risk and confidence thresholds
    pub thresholds: Thresholds,
    /// Timeline tier ceilings
    pub timeline: TimelineCeilings,
    /// Planning constants
    pub planning: PlanningConfig,
    /// Recommendations analysed for primary factors and risks
    pub analysis_window: usize,
    /// Maximum recommendations returned
    pub max_recommendations: usize,
    /// Catalog size from which scoring fans out across threads
    pub parallel_threshold: usize,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With scoring weights
    #[inline]
    #[must_use]
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// With max recommendations
    #[inline]
    #[must_use]
    pub fn with_max_recommendations(mut self, max: usize) -> Self {
        self.max_recommendations = max;
        self
    }

    /// With plan size
    #[inline]
    #[must_use]
    pub fn with_plan_size(mut self, size: usize) -> Self {
        self.planning.plan_size = size;
        self
    }

    /// With parallel threshold (0 always fans out)
    #[inline]
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Validate every setting
    ///
    /// # Errors
    /// Returns the first invalid setting found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;

        let t = &self.thresholds;
        for (name, value) in [
            ("thresholds.reason", t.reason),
            ("thresholds.risk", t.risk),
            ("thresholds.high_confidence", t.high_confidence),
            ("thresholds.medium_confidence", t.medium_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidSetting {
                    name,
                    reason: format!("{value} is outside [0, 1]"),
                });
            }
        }
        if t.risk > t.reason {
            return Err(ConfigError::InvalidSetting {
                name: "thresholds.risk",
                reason: "must not exceed thresholds.reason".to_string(),
            });
        }
        if t.medium_confidence > t.high_confidence {
            return Err(ConfigError::InvalidSetting {
                name: "thresholds.medium_confidence",
                reason: "must not exceed thresholds.high_confidence".to_string(),
            });
        }
        if t.full_separation_gap <= 0.0 || !t.full_separation_gap.is_finite() {
            return Err(ConfigError::InvalidSetting {
                name: "thresholds.full_separation_gap",
                reason: "must be a positive number".to_string(),
            });
        }

        for tier in [
            TimelineTier::Urgent,
            TimelineTier::Fast,
            TimelineTier::Normal,
            TimelineTier::Extended,
        ] {
            let ceiling = self.timeline.ceiling(tier);
            if ceiling <= 0.0 || !ceiling.is_finite() {
                return Err(ConfigError::InvalidSetting {
                    name: "timeline",
                    reason: format!("{tier} ceiling must be a positive number"),
                });
            }
        }

        let p = &self.planning;
        if p.plan_size == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "planning.plan_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if p.phase_buffer < 0.0 || !p.phase_buffer.is_finite() {
            return Err(ConfigError::InvalidSetting {
                name: "planning.phase_buffer",
                reason: "must be a non-negative number".to_string(),
            });
        }
        if p.hours_per_week <= 0.0 || !p.hours_per_week.is_finite() {
            return Err(ConfigError::InvalidSetting {
                name: "planning.hours_per_week",
                reason: "must be a positive number".to_string(),
            });
        }
        if self.analysis_window == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "analysis_window",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_recommendations == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "max_recommendations",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns error if TOML is invalid or a setting is out of range
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate YAML
    ///
    /// # Errors
    /// Returns error if YAML is invalid or a setting is out of range
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, has an unknown extension or is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&raw),
            Some("yaml" | "yml") => Self::from_yaml_str(&raw),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            thresholds: Thresholds::default(),
            timeline: TimelineCeilings::default(),
            planning: PlanningConfig::default(),
            analysis_window: 5,
            max_recommendations: 10,
            parallel_threshold: 32,
        }
    }
}
