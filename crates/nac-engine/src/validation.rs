//! Context validation
//!
//! Turns a caller-supplied [`RecommendationContext`] into a [`ValidContext`]:
//! bounded fields become enums, tag sets are trimmed, lower-cased and
//! de-duplicated, and device counts are checked. A `ValidContext` can only be
//! obtained through [`validate`], so every later stage works on normalized
//! input.

use nac_model::{
    ExpertiseLevel, NetworkComplexity, OrganizationSize, RecommendationContext, TimelineTier,
    ValidationError,
};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Number of scoring-relevant context fields used for completeness
const COMPLETENESS_FIELDS: usize = 12;

/// Validated, normalized recommendation context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidContext {
    industry: Option<String>,
    organization_size: Option<OrganizationSize>,
    expertise: Option<ExpertiseLevel>,
    network_complexity: Option<NetworkComplexity>,
    existing_vendors: BTreeSet<String>,
    device_inventory: BTreeMap<String, u32>,
    compliance_frameworks: BTreeSet<String>,
    security_requirements: BTreeSet<String>,
    budget_range: Option<String>,
    timeline: Option<TimelineTier>,
    use_cases: BTreeSet<String>,
    pain_points: BTreeSet<String>,
    project_id: Option<String>,
    site_id: Option<String>,
}

impl ValidContext {
    /// Industry, trimmed
    #[inline]
    #[must_use]
    pub fn industry(&self) -> Option<&str> {
        self.industry.as_deref()
    }

    /// Organization size
    #[inline]
    #[must_use]
    pub fn organization_size(&self) -> Option<OrganizationSize> {
        self.organization_size
    }

    /// Team expertise
    #[inline]
    #[must_use]
    pub fn expertise(&self) -> Option<ExpertiseLevel> {
        self.expertise
    }

    /// Network complexity
    #[inline]
    #[must_use]
    pub fn network_complexity(&self) -> Option<NetworkComplexity> {
        self.network_complexity
    }

    /// Existing vendors (normalized)
    #[inline]
    #[must_use]
    pub fn existing_vendors(&self) -> &BTreeSet<String> {
        &self.existing_vendors
    }

    /// Device counts per normalized class
    #[inline]
    #[must_use]
    pub fn device_inventory(&self) -> &BTreeMap<String, u32> {
        &self.device_inventory
    }

    /// Total devices across classes
    #[must_use]
    pub fn total_devices(&self) -> u64 {
        self.device_inventory.values().map(|c| u64::from(*c)).sum()
    }

    /// Compliance frameworks (normalized)
    #[inline]
    #[must_use]
    pub fn compliance_frameworks(&self) -> &BTreeSet<String> {
        &self.compliance_frameworks
    }

    /// Security requirements (normalized)
    #[inline]
    #[must_use]
    pub fn security_requirements(&self) -> &BTreeSet<String> {
        &self.security_requirements
    }

    /// Budget range, trimmed
    #[inline]
    #[must_use]
    pub fn budget_range(&self) -> Option<&str> {
        self.budget_range.as_deref()
    }

    /// Timeline tier
    #[inline]
    #[must_use]
    pub fn timeline(&self) -> Option<TimelineTier> {
        self.timeline
    }

    /// Use cases (normalized)
    #[inline]
    #[must_use]
    pub fn use_cases(&self) -> &BTreeSet<String> {
        &self.use_cases
    }

    /// Pain points (normalized)
    #[inline]
    #[must_use]
    pub fn pain_points(&self) -> &BTreeSet<String> {
        &self.pain_points
    }

    /// Project provenance
    #[inline]
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Site provenance
    #[inline]
    #[must_use]
    pub fn site_id(&self) -> Option<&str> {
        self.site_id.as_deref()
    }

    /// Fraction of the twelve scoring-relevant fields that are populated
    #[must_use]
    pub fn completeness(&self) -> f64 {
        let populated = [
            self.industry.is_some(),
            self.organization_size.is_some(),
            self.expertise.is_some(),
            self.network_complexity.is_some(),
            !self.existing_vendors.is_empty(),
            !self.device_inventory.is_empty(),
            !self.compliance_frameworks.is_empty(),
            !self.security_requirements.is_empty(),
            self.budget_range.is_some(),
            self.timeline.is_some(),
            !self.use_cases.is_empty(),
            !self.pain_points.is_empty(),
        ]
        .iter()
        .filter(|p| **p)
        .count();

        populated as f64 / COMPLETENESS_FIELDS as f64
    }
}

/// Lower-case a tag and collapse its whitespace; blank tags yield `None`
#[must_use]
pub fn normalize_tag(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.to_lowercase())
    }
}

/// Normalize a list of tags into a de-duplicated set
pub(crate) fn normalize_tags<'a>(raw: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    raw.into_iter().filter_map(|s| normalize_tag(s)).collect()
}

fn trimmed(raw: Option<&String>) -> Option<String> {
    raw.map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
}

fn parse_bounded<T: FromStr>(
    field: &'static str,
    raw: Option<&String>,
) -> Result<Option<T>, ValidationError>
where
    T::Err: std::fmt::Display,
{
    match trimmed(raw) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| ValidationError::new(field, e.to_string())),
    }
}

fn validate_inventory(raw: &BTreeMap<String, i64>) -> Result<BTreeMap<String, u32>, ValidationError> {
    let mut inventory = BTreeMap::new();
    for (class, count) in raw {
        if *count < 0 {
            return Err(ValidationError::new(
                "deviceInventory",
                format!("negative count {count} for `{class}`"),
            ));
        }
        let count = u32::try_from(*count).map_err(|_| {
            ValidationError::new("deviceInventory", format!("count {count} for `{class}` is too large"))
        })?;
        let Some(key) = normalize_tag(class) else {
            return Err(ValidationError::new("deviceInventory", "blank device class"));
        };
        let entry: &mut u32 = inventory.entry(key).or_insert(0);
        *entry = entry.saturating_add(count);
    }
    Ok(inventory)
}

/// Validate and normalize a recommendation context
///
/// # Errors
/// - `field = "context"` when no industry, use case or existing vendor is given
/// - the camelCase field name when a bounded field holds an unknown value
/// - `field = "deviceInventory"` when a count is negative
pub fn validate(context: &RecommendationContext) -> Result<ValidContext, ValidationError> {
    let industry = trimmed(context.industry.as_ref());
    let existing_vendors = normalize_tags(&context.existing_vendors);
    let use_cases = normalize_tags(&context.use_cases);

    if industry.is_none() && existing_vendors.is_empty() && use_cases.is_empty() {
        return Err(ValidationError::missing_signal());
    }

    let organization_size =
        parse_bounded::<OrganizationSize>("organizationSize", context.organization_size.as_ref())?;
    let network_complexity = parse_bounded::<NetworkComplexity>(
        "networkComplexity",
        context.network_complexity.as_ref(),
    )?;
    let expertise =
        parse_bounded::<ExpertiseLevel>("userExpertiseLevel", context.user_expertise_level.as_ref())?;
    let timeline =
        parse_bounded::<TimelineTier>("timelineConstraints", context.timeline_constraints.as_ref())?;
    let device_inventory = validate_inventory(&context.device_inventory)?;

    Ok(ValidContext {
        industry,
        organization_size,
        expertise,
        network_complexity,
        existing_vendors,
        device_inventory,
        compliance_frameworks: normalize_tags(&context.compliance_frameworks),
        security_requirements: normalize_tags(&context.security_requirements),
        budget_range: trimmed(context.budget_range.as_ref()),
        timeline,
        use_cases,
        pain_points: normalize_tags(&context.pain_points),
        project_id: trimmed(context.project_id.as_ref()),
        site_id: trimmed(context.site_id.as_ref()),
    })
}
