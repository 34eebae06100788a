//! Core types for the NAC template advisor
//!
//! Defines the identifiers and bounded vocabularies shared by every stage:
//! - Template, recommendation and result identifiers
//! - Organization size, expertise, network complexity and timeline tiers
//! - Template complexity, confidence and customization levels
//! - Scoring dimensions and pipeline stages

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Catalog template identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    /// Create template ID
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TemplateId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unique recommendation identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecommendationId(pub Ulid);

impl RecommendationId {
    /// Generate new recommendation ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RecommendationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecommendationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecommendationId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(Self)
    }
}

/// Unique result identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResultId(pub Ulid);

impl ResultId {
    /// Generate new result ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ResultId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unknown value for a bounded vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    /// Vocabulary name
    pub kind: &'static str,
    /// Rejected input
    pub value: String,
    /// Accepted spellings
    pub expected: &'static [&'static str],
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown {} `{}` (expected one of: {})",
            self.kind,
            self.value,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for UnknownVariant {}

/// Lower-case key ignoring spaces, `-` and `_`, so "Mid-Market", "mid market"
/// and "MID_MARKET" compare equal
fn variant_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Serialize as the canonical spelling, deserialize through the lenient `FromStr`
macro_rules! string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Organization size
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrganizationSize {
    /// Small and medium business
    Smb,
    /// Mid-market
    MidMarket,
    /// Enterprise
    Enterprise,
}

impl OrganizationSize {
    const SPELLINGS: &'static [&'static str] = &["SMB", "Mid-Market", "Enterprise"];

    /// Canonical spelling
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smb => "SMB",
            Self::MidMarket => "Mid-Market",
            Self::Enterprise => "Enterprise",
        }
    }
}

impl FromStr for OrganizationSize {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match variant_key(s).as_str() {
            "smb" => Ok(Self::Smb),
            "midmarket" => Ok(Self::MidMarket),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(UnknownVariant {
                kind: "organization size",
                value: s.to_string(),
                expected: Self::SPELLINGS,
            }),
        }
    }
}

string_serde!(OrganizationSize);

/// User expertise level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpertiseLevel {
    /// New to NAC deployments
    Beginner,
    /// Has deployed NAC before
    Intermediate,
    /// Runs complex deployments
    Advanced,
    /// Designs deployments for others
    Expert,
}

impl ExpertiseLevel {
    const SPELLINGS: &'static [&'static str] = &["beginner", "intermediate", "advanced", "expert"];

    /// Canonical spelling
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    /// Position on the shared 0..=3 difficulty scale
    #[inline]
    #[must_use]
    pub fn step(&self) -> u8 {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
            Self::Expert => 3,
        }
    }
}

impl FromStr for ExpertiseLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match variant_key(s).as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "expert" => Ok(Self::Expert),
            _ => Err(UnknownVariant {
                kind: "expertise level",
                value: s.to_string(),
                expected: Self::SPELLINGS,
            }),
        }
    }
}

string_serde!(ExpertiseLevel);

/// Network complexity of the customer estate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NetworkComplexity {
    /// Flat network, few sites
    Simple,
    /// Some segmentation
    Moderate,
    /// Many sites and segments
    Complex,
    /// Global, heavily segmented
    VeryComplex,
}

impl NetworkComplexity {
    const SPELLINGS: &'static [&'static str] = &["Simple", "Moderate", "Complex", "Very Complex"];

    /// Canonical spelling
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Moderate => "Moderate",
            Self::Complex => "Complex",
            Self::VeryComplex => "Very Complex",
        }
    }

    /// Position on the shared 0..=3 difficulty scale
    #[inline]
    #[must_use]
    pub fn step(&self) -> u8 {
        match self {
            Self::Simple => 0,
            Self::Moderate => 1,
            Self::Complex => 2,
            Self::VeryComplex => 3,
        }
    }
}

impl FromStr for NetworkComplexity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match variant_key(s).as_str() {
            "simple" => Ok(Self::Simple),
            "moderate" => Ok(Self::Moderate),
            "complex" => Ok(Self::Complex),
            "verycomplex" => Ok(Self::VeryComplex),
            _ => Err(UnknownVariant {
                kind: "network complexity",
                value: s.to_string(),
                expected: Self::SPELLINGS,
            }),
        }
    }
}

string_serde!(NetworkComplexity);

/// Declared timeline pressure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimelineTier {
    /// Must land within days
    Urgent,
    /// A few weeks
    Fast,
    /// A regular project cadence
    Normal,
    /// Long-running programme
    Extended,
}

impl TimelineTier {
    const SPELLINGS: &'static [&'static str] = &["urgent", "fast", "normal", "extended"];

    /// Canonical spelling
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::Fast => "fast",
            Self::Normal => "normal",
            Self::Extended => "extended",
        }
    }
}

impl FromStr for TimelineTier {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match variant_key(s).as_str() {
            "urgent" => Ok(Self::Urgent),
            "fast" => Ok(Self::Fast),
            "normal" => Ok(Self::Normal),
            "extended" => Ok(Self::Extended),
            _ => Err(UnknownVariant {
                kind: "timeline tier",
                value: s.to_string(),
                expected: Self::SPELLINGS,
            }),
        }
    }
}

string_serde!(TimelineTier);

/// Template complexity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComplexityLevel {
    /// Basic
    Basic,
    /// Intermediate
    Intermediate,
    /// Advanced
    Advanced,
    /// Expert
    Expert,
}

impl ComplexityLevel {
    const SPELLINGS: &'static [&'static str] = &["basic", "intermediate", "advanced", "expert"];

    /// Canonical spelling
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    /// Position on the shared 0..=3 difficulty scale
    #[inline]
    #[must_use]
    pub fn step(&self) -> u8 {
        match self {
            Self::Basic => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
            Self::Expert => 3,
        }
    }
}

impl FromStr for ComplexityLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match variant_key(s).as_str() {
            "basic" => Ok(Self::Basic),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "expert" => Ok(Self::Expert),
            _ => Err(UnknownVariant {
                kind: "complexity level",
                value: s.to_string(),
                expected: Self::SPELLINGS,
            }),
        }
    }
}

string_serde!(ComplexityLevel);

/// Confidence attached to a single recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Weak match
    Low,
    /// Reasonable match
    Medium,
    /// Strong match with few risks
    High,
}

/// How much a template needs to be adapted before use
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomizationLevel {
    /// Usable nearly as-is
    Minimal,
    /// Some policy work required
    Moderate,
    /// Significant rework required
    Extensive,
}

/// One of the five scoring criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreDimension {
    /// Existing vendor estate
    VendorAffinity,
    /// Requested use cases
    UseCaseCoverage,
    /// Compliance frameworks
    ComplianceCoverage,
    /// Network complexity and expertise
    ComplexityFit,
    /// Timeline constraints
    TimelineFit,
}

impl ScoreDimension {
    /// All dimensions in their fixed tie-break order
    pub const ALL: [ScoreDimension; 5] = [
        Self::VendorAffinity,
        Self::UseCaseCoverage,
        Self::ComplianceCoverage,
        Self::ComplexityFit,
        Self::TimelineFit,
    ];

    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::VendorAffinity => "vendor affinity",
            Self::UseCaseCoverage => "use-case coverage",
            Self::ComplianceCoverage => "compliance coverage",
            Self::ComplexityFit => "complexity fit",
            Self::TimelineFit => "timeline fit",
        }
    }
}

impl fmt::Display for ScoreDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pipeline stage, used to report where a call was cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    /// Context validation
    Validation,
    /// Per-template scoring fan-out
    Scoring,
    /// Ranking and confidence
    Ranking,
    /// Strategy planning
    Planning,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::Scoring => "scoring",
            Self::Ranking => "ranking",
            Self::Planning => "planning",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_size_spellings() {
        assert_eq!("Mid-Market".parse::<OrganizationSize>(), Ok(OrganizationSize::MidMarket));
        assert_eq!("mid market".parse::<OrganizationSize>(), Ok(OrganizationSize::MidMarket));
        assert_eq!("SMB".parse::<OrganizationSize>(), Ok(OrganizationSize::Smb));
        assert!("huge".parse::<OrganizationSize>().is_err());
    }

    #[test]
    fn punctuation_other_than_separators_is_rejected() {
        assert_eq!("MID_MARKET".parse::<OrganizationSize>(), Ok(OrganizationSize::MidMarket));
        assert_eq!(" Enterprise ".parse::<OrganizationSize>(), Ok(OrganizationSize::Enterprise));
        assert!("S.M.B".parse::<OrganizationSize>().is_err());
        assert!("Enter/prise!".parse::<OrganizationSize>().is_err());
        assert!("mid\tmarket".parse::<OrganizationSize>().is_err());
    }

    #[test]
    fn network_complexity_two_words() {
        assert_eq!(
            "Very Complex".parse::<NetworkComplexity>(),
            Ok(NetworkComplexity::VeryComplex)
        );
        assert_eq!(
            "very_complex".parse::<NetworkComplexity>(),
            Ok(NetworkComplexity::VeryComplex)
        );
        assert_eq!(NetworkComplexity::VeryComplex.to_string(), "Very Complex");
    }

    #[test]
    fn unknown_variant_lists_expected() {
        let err = "wizard".parse::<ExpertiseLevel>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("wizard"));
        assert!(message.contains("beginner"));
    }

    #[test]
    fn steps_share_scale() {
        assert_eq!(NetworkComplexity::Moderate.step(), ComplexityLevel::Intermediate.step());
        assert_eq!(ExpertiseLevel::Expert.step(), ComplexityLevel::Expert.step());
    }

    #[test]
    fn complexity_serde_roundtrip_is_lenient() {
        let level: ComplexityLevel = serde_json::from_str("\"Advanced\"").unwrap();
        assert_eq!(level, ComplexityLevel::Advanced);
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"advanced\"");
        assert!(serde_json::from_str::<ComplexityLevel>("\"galaxy-brain\"").is_err());
    }

    #[test]
    fn recommendation_id_parses_back() {
        let id = RecommendationId::new();
        assert_eq!(id.to_string().parse::<RecommendationId>().unwrap(), id);
    }
}
