//! Recommendation context
//!
//! The raw, caller-supplied description of an organization. Bounded fields
//! arrive as strings and are only trusted after validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Description of an organization's environment, requirements and goals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationContext {
    /// Industry vertical (healthcare, finance, ...)
    pub industry: Option<String>,
    /// SMB, Mid-Market or Enterprise
    pub organization_size: Option<String>,
    /// beginner, intermediate, advanced or expert
    pub user_expertise_level: Option<String>,
    /// Simple, Moderate, Complex or Very Complex
    pub network_complexity: Option<String>,
    /// Vendors already deployed
    pub existing_vendors: Vec<String>,
    /// Device class to count
    pub device_inventory: BTreeMap<String, i64>,
    /// Compliance frameworks to satisfy
    pub compliance_frameworks: Vec<String>,
    /// Security requirements
    pub security_requirements: Vec<String>,
    /// Free-form budget range
    pub budget_range: Option<String>,
    /// urgent, fast, normal or extended
    pub timeline_constraints: Option<String>,
    /// Use cases to cover
    pub use_cases: Vec<String>,
    /// Pain points motivating the project
    pub pain_points: Vec<String>,
    /// Provenance only, never scored
    pub project_id: Option<String>,
    /// Provenance only, never scored
    pub site_id: Option<String>,
}

impl RecommendationContext {
    /// Create empty context
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With industry
    #[inline]
    #[must_use]
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// With organization size
    #[inline]
    #[must_use]
    pub fn with_organization_size(mut self, size: impl Into<String>) -> Self {
        self.organization_size = Some(size.into());
        self
    }

    /// With user expertise level
    #[inline]
    #[must_use]
    pub fn with_expertise(mut self, level: impl Into<String>) -> Self {
        self.user_expertise_level = Some(level.into());
        self
    }

    /// With network complexity
    #[inline]
    #[must_use]
    pub fn with_network_complexity(mut self, complexity: impl Into<String>) -> Self {
        self.network_complexity = Some(complexity.into());
        self
    }

    /// Add an existing vendor
    #[inline]
    #[must_use]
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.existing_vendors.push(vendor.into());
        self
    }

    /// Set a device count
    #[inline]
    #[must_use]
    pub fn with_devices(mut self, class: impl Into<String>, count: i64) -> Self {
        self.device_inventory.insert(class.into(), count);
        self
    }

    /// Add a compliance framework
    #[inline]
    #[must_use]
    pub fn with_compliance(mut self, framework: impl Into<String>) -> Self {
        self.compliance_frameworks.push(framework.into());
        self
    }

    /// Add a security requirement
    #[inline]
    #[must_use]
    pub fn with_security_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.security_requirements.push(requirement.into());
        self
    }

    /// With budget range
    #[inline]
    #[must_use]
    pub fn with_budget(mut self, budget: impl Into<String>) -> Self {
        self.budget_range = Some(budget.into());
        self
    }

    /// With timeline tier
    #[inline]
    #[must_use]
    pub fn with_timeline(mut self, timeline: impl Into<String>) -> Self {
        self.timeline_constraints = Some(timeline.into());
        self
    }

    /// Add a use case
    #[inline]
    #[must_use]
    pub fn with_use_case(mut self, use_case: impl Into<String>) -> Self {
        self.use_cases.push(use_case.into());
        self
    }

    /// Add a pain point
    #[inline]
    #[must_use]
    pub fn with_pain_point(mut self, pain_point: impl Into<String>) -> Self {
        self.pain_points.push(pain_point.into());
        self
    }

    /// With project and site provenance
    #[inline]
    #[must_use]
    pub fn with_provenance(mut self, project_id: impl Into<String>, site_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self.site_id = Some(site_id.into());
        self
    }
}
