//! Testing utilities for the NAC advisor workspace
//!
//! Shared contexts, catalogs and engine fixtures.

#![allow(missing_docs)]

use nac_engine::{CatalogSnapshot, RecommendationEngine};
use nac_model::{ComplexityLevel, EngineConfig, RecommendationContext, TemplateMetadata};
use std::sync::Arc;

pub type TestEngine = RecommendationEngine<Arc<CatalogSnapshot>>;

/// Cisco estate, device authentication, moderate network, intermediate team
pub fn scenario_a_context() -> RecommendationContext {
    RecommendationContext::new()
        .with_vendor("Cisco")
        .with_use_case("Device Authentication")
        .with_network_complexity("Moderate")
        .with_expertise("intermediate")
}

/// Context populating every scoring-relevant field
pub fn enterprise_context() -> RecommendationContext {
    RecommendationContext::new()
        .with_industry("Healthcare")
        .with_organization_size("Enterprise")
        .with_expertise("advanced")
        .with_network_complexity("Complex")
        .with_vendor("Cisco")
        .with_devices("laptops", 1200)
        .with_devices("medical devices", 300)
        .with_compliance("HIPAA")
        .with_security_requirement("MFA")
        .with_budget("250k-500k")
        .with_timeline("normal")
        .with_use_case("Device Authentication")
        .with_use_case("IoT Profiling")
        .with_pain_point("Unmanaged devices")
        .with_provenance("proj-42", "site-hq")
}

pub fn cisco_dot1x() -> TemplateMetadata {
    TemplateMetadata::new("t1", "Cisco", "802.1X", ComplexityLevel::Intermediate, 40.0)
        .with_name("Cisco ISE 802.1X wired")
        .with_use_case("Device Authentication")
        .with_skill("RADIUS")
}

pub fn fortinet_guest() -> TemplateMetadata {
    TemplateMetadata::new("t2", "Fortinet", "Guest Access", ComplexityLevel::Expert, 80.0)
        .with_name("FortiNAC guest portal")
        .with_use_case("Guest Access")
}

pub fn snapshot(templates: Vec<TemplateMetadata>) -> Arc<CatalogSnapshot> {
    Arc::new(CatalogSnapshot::new("test", templates).unwrap())
}

pub fn scenario_a_catalog() -> Arc<CatalogSnapshot> {
    snapshot(vec![cisco_dot1x(), fortinet_guest()])
}

fn chain_link(id: &str, dependency: Option<&str>) -> TemplateMetadata {
    let template = TemplateMetadata::new(id, "Cisco", "802.1X", ComplexityLevel::Intermediate, 40.0)
        .with_use_case("Device Authentication");
    match dependency {
        Some(dep) => template.depends_on(dep),
        None => template,
    }
}

/// T1 <- T2 <- T3, each 40 hours
pub fn chain_catalog() -> Arc<CatalogSnapshot> {
    snapshot(vec![
        chain_link("T1", None),
        chain_link("T2", Some("T1")),
        chain_link("T3", Some("T2")),
    ])
}

/// A <-> B, plus an independent C
pub fn cycle_catalog() -> Arc<CatalogSnapshot> {
    snapshot(vec![
        chain_link("A", Some("B")),
        chain_link("B", Some("A")),
        chain_link("C", None),
    ])
}

/// `count` Cisco/Aruba templates with varying coverage, hours and complexity
pub fn large_catalog(count: usize) -> Arc<CatalogSnapshot> {
    const VENDORS: [&str; 3] = ["Cisco", "Aruba", "Generic"];
    const USE_CASES: [&str; 4] = [
        "Device Authentication",
        "Guest Access",
        "IoT Profiling",
        "Posture Assessment",
    ];
    const LEVELS: [ComplexityLevel; 4] = [
        ComplexityLevel::Basic,
        ComplexityLevel::Intermediate,
        ComplexityLevel::Advanced,
        ComplexityLevel::Expert,
    ];

    let templates = (0..count)
        .map(|i| {
            let mut template = TemplateMetadata::new(
                format!("tpl-{i:04}"),
                VENDORS[i % VENDORS.len()],
                "802.1X",
                LEVELS[i % LEVELS.len()],
                (8 * (1 + i % 30)) as f64,
            )
            .with_use_case(USE_CASES[i % USE_CASES.len()])
            .with_skill(format!("skill-{}", i % 5));
            if i % 3 == 0 {
                template = template.with_compliance("HIPAA");
            }
            if i % 2 == 1 {
                template = template.with_use_case(USE_CASES[(i + 1) % USE_CASES.len()]);
            }
            template
        })
        .collect();
    snapshot(templates)
}

pub fn engine(catalog: Arc<CatalogSnapshot>) -> TestEngine {
    RecommendationEngine::with_defaults(catalog)
}

pub fn engine_with(catalog: Arc<CatalogSnapshot>, config: EngineConfig) -> TestEngine {
    RecommendationEngine::new(catalog, config).unwrap()
}
