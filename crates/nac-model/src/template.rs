//! Catalog template metadata
//!
//! Owned and versioned by the catalog; read-only for the engine.

use crate::types::{ComplexityLevel, TemplateId};
use serde::{Deserialize, Serialize};

/// A reusable configuration/deployment blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    /// Catalog id
    pub id: TemplateId,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Vendor, or a vendor-agnostic marker such as "Generic"
    pub vendor: String,
    /// Category (802.1X, Guest Access, Profiling, ...)
    pub category: String,
    /// Difficulty of the template
    pub complexity_level: ComplexityLevel,
    /// Use cases the template addresses
    #[serde(default)]
    pub supported_use_cases: Vec<String>,
    /// Compliance frameworks the template helps satisfy
    #[serde(default)]
    pub compliance_coverage: Vec<String>,
    /// Typical effort to deploy, in hours
    pub typical_deployment_hours: f64,
    /// Templates that should be applied first
    #[serde(default)]
    pub dependencies: Vec<TemplateId>,
    /// Extra matching tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Skills the catalog declares as required
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_skills: Vec<String>,
}

impl TemplateMetadata {
    /// Create template with the mandatory fields
    #[must_use]
    pub fn new(
        id: impl Into<TemplateId>,
        vendor: impl Into<String>,
        category: impl Into<String>,
        complexity_level: ComplexityLevel,
        typical_deployment_hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: None,
            vendor: vendor.into(),
            category: category.into(),
            complexity_level,
            supported_use_cases: Vec::new(),
            compliance_coverage: Vec::new(),
            typical_deployment_hours,
            dependencies: Vec::new(),
            tags: Vec::new(),
            required_skills: Vec::new(),
        }
    }

    /// With display name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a supported use case
    #[inline]
    #[must_use]
    pub fn with_use_case(mut self, use_case: impl Into<String>) -> Self {
        self.supported_use_cases.push(use_case.into());
        self
    }

    /// Add a covered compliance framework
    #[inline]
    #[must_use]
    pub fn with_compliance(mut self, framework: impl Into<String>) -> Self {
        self.compliance_coverage.push(framework.into());
        self
    }

    /// Add a dependency on another template
    #[inline]
    #[must_use]
    pub fn depends_on(mut self, id: impl Into<TemplateId>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    /// Add a matching tag
    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add a required skill
    #[inline]
    #[must_use]
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skills.push(skill.into());
        self
    }

    /// Name for display, falling back to the id
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}
