use nac_engine::{
    CancellationToken, CatalogSnapshot, CatalogSource, RecommendationEngine, SharedCatalog,
};
use nac_model::{
    CatalogError, ComplexityLevel, ConfidenceLevel, EngineError, PipelineStage,
    RecommendationContext, SmartRecommendationResult, TemplateMetadata,
};
use nac_test_utils::*;
use pretty_assertions::assert_eq;
use std::io::Write;

fn template_ids(result: &SmartRecommendationResult) -> Vec<&str> {
    result
        .recommendations
        .iter()
        .map(|r| r.template_id.as_str())
        .collect()
}

#[test]
fn test_scenario_a_ranks_matching_template_first() {
    let result = engine(scenario_a_catalog())
        .generate(&scenario_a_context())
        .unwrap();

    assert_eq!(template_ids(&result), vec!["t1", "t2"]);
    let top = result.top().unwrap();
    assert_eq!(top.confidence_level, ConfidenceLevel::High);
    assert!((top.score - 1.0).abs() < 1e-9);
    assert!(top.risk_factors.is_empty());
    assert_eq!(result.recommendations[1].confidence_level, ConfidenceLevel::Low);
}

#[test]
fn test_scenario_b_rejects_context_without_signal() {
    let context = RecommendationContext::new()
        .with_compliance("PCI-DSS")
        .with_network_complexity("Simple");
    let err = engine(scenario_a_catalog()).generate(&context).unwrap_err();

    assert!(err.is_caller_error());
    assert!(!err.is_retryable());
    match err {
        EngineError::Validation(e) => assert_eq!(e.field, "context"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_scenario_c_chain_is_phased_in_order() {
    let result = engine(chain_catalog())
        .generate(&scenario_a_context())
        .unwrap();
    let strategy = &result.implementation_strategy;

    assert!(strategy.ordered);
    assert_eq!(strategy.phases.len(), 3);
    for (phase, expected) in strategy.phases.iter().zip(["T1", "T2", "T3"]) {
        assert_eq!(phase.templates.len(), 1);
        assert_eq!(phase.templates[0].as_str(), expected);
        // 40h + 20% buffer = 48h, two 40h weeks
        assert_eq!(phase.duration_weeks, 2);
    }
    assert_eq!(
        strategy
            .critical_path
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>(),
        vec!["T1", "T2", "T3"]
    );
    assert_eq!(strategy.total_timeline_weeks, 6);
    assert_eq!(strategy.phases[2].dependencies, vec!["Phase 2".to_string()]);
}

#[test]
fn test_empty_catalog_is_a_valid_result() {
    let result = engine(snapshot(Vec::new()))
        .generate(&scenario_a_context())
        .unwrap();

    assert!(result.recommendations.is_empty());
    assert_eq!(result.metadata.confidence, 0.0);
    assert_eq!(
        result.context_analysis.risk_assessment,
        vec!["no templates matched".to_string()]
    );
    assert!(result.implementation_strategy.phases.is_empty());
    assert_eq!(result.metadata.templates_evaluated, 0);
}

#[test]
fn test_cycle_degrades_to_unordered_plan() {
    let result = engine(cycle_catalog())
        .generate(&scenario_a_context())
        .unwrap();
    let strategy = &result.implementation_strategy;

    assert_eq!(result.recommendations.len(), 3);
    assert!(!strategy.ordered);
    assert_eq!(strategy.phases.len(), 1);
    assert_eq!(strategy.phases[0].name, "Unordered rollout");
    assert_eq!(strategy.phases[0].templates.len(), 3);
    assert!(strategy.critical_path.is_empty());
    assert!(result
        .context_analysis
        .risk_assessment
        .iter()
        .any(|r| r.contains("cyclic dependency between templates: A, B")));
}

#[test]
fn test_out_of_catalog_dependency_becomes_risk_note() {
    let catalog = snapshot(vec![
        cisco_dot1x().depends_on("radius-base"),
        fortinet_guest(),
    ]);
    let result = engine(catalog).generate(&scenario_a_context()).unwrap();

    assert!(result.implementation_strategy.ordered);
    assert!(result
        .context_analysis
        .risk_assessment
        .iter()
        .any(|r| r.contains("radius-base")));
}

#[test]
fn test_generation_is_deterministic() {
    let engine = engine(large_catalog(60));
    let context = enterprise_context();

    let first = engine.generate(&context).unwrap();
    let second = engine.generate(&context).unwrap();

    let strip = |r: &SmartRecommendationResult| {
        r.recommendations
            .iter()
            .map(|x| {
                (
                    x.template_id.clone(),
                    x.score.to_bits(),
                    x.reasons.clone(),
                    x.risk_factors.clone(),
                    x.required_skills.clone(),
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(strip(&first), strip(&second));
    assert_eq!(first.context_analysis, second.context_analysis);
    assert_eq!(first.implementation_strategy, second.implementation_strategy);
    assert_eq!(first.metadata.confidence, second.metadata.confidence);
    assert_eq!(first.metadata.catalog_fingerprint, second.metadata.catalog_fingerprint);
    assert_ne!(first.result_id, second.result_id);
}

#[test]
fn test_output_is_truncated_and_sorted() {
    let result = engine(large_catalog(40))
        .generate(&enterprise_context())
        .unwrap();

    assert_eq!(result.recommendations.len(), 10);
    assert_eq!(result.metadata.templates_evaluated, 40);
    assert!(result
        .recommendations
        .windows(2)
        .all(|w| w[0].score >= w[1].score));
    assert!(result.implementation_strategy.phases.iter().map(|p| p.templates.len()).sum::<usize>() <= 8);
}

#[test]
fn test_full_context_metadata() {
    let result = engine(scenario_a_catalog())
        .generate(&enterprise_context())
        .unwrap();

    assert_eq!(result.metadata.project_id.as_deref(), Some("proj-42"));
    assert_eq!(result.metadata.site_id.as_deref(), Some("site-hq"));
    assert_eq!(result.metadata.catalog_version, "test");
    assert_eq!(
        result.context_analysis.recommended_approach,
        "Phased rollout starting with a pilot site, then expanding region by region"
    );
    assert!(result.metadata.confidence >= 0.5);
}

#[test]
fn test_cancelled_call_returns_cancelled() {
    let token = CancellationToken::new();
    token.cancel();
    let err = engine(large_catalog(50))
        .generate_with_cancel(&scenario_a_context(), &token)
        .unwrap_err();
    assert!(matches!(err, EngineError::Cancelled { stage: PipelineStage::Validation }));
    assert!(!err.is_caller_error());
}

struct CancelOnSnapshot {
    catalog: std::sync::Arc<CatalogSnapshot>,
    token: CancellationToken,
}

impl CatalogSource for CancelOnSnapshot {
    fn snapshot(&self) -> Result<std::sync::Arc<CatalogSnapshot>, CatalogError> {
        self.token.cancel();
        Ok(self.catalog.clone())
    }
}

#[test]
fn test_cancel_while_fetching_snapshot_stops_scoring() {
    let token = CancellationToken::new();
    let source = CancelOnSnapshot {
        catalog: large_catalog(50),
        token: token.clone(),
    };
    let err = RecommendationEngine::with_defaults(source)
        .generate_with_cancel(&scenario_a_context(), &token)
        .unwrap_err();
    assert!(matches!(err, EngineError::Cancelled { stage: PipelineStage::Scoring }));
}

#[test]
fn test_oversized_deployment_hours_saturate_timeline() {
    let catalog = snapshot(vec![
        TemplateMetadata::new("a", "Cisco", "802.1X", ComplexityLevel::Basic, 1e12)
            .with_use_case("Device Authentication"),
        TemplateMetadata::new("b", "Cisco", "802.1X", ComplexityLevel::Basic, 1e12)
            .with_use_case("Device Authentication")
            .depends_on("a"),
        TemplateMetadata::new("c", "Cisco", "802.1X", ComplexityLevel::Basic, 1.6e308)
            .with_use_case("Device Authentication"),
    ]);

    let result = engine(catalog).generate(&scenario_a_context()).unwrap();
    let strategy = &result.implementation_strategy;
    assert!(strategy.ordered);
    assert_eq!(strategy.total_timeline_weeks, u32::MAX);
    assert!(strategy.phases.iter().all(|p| p.duration_weeks == u32::MAX));
}

#[test]
fn test_shared_catalog_publish_is_seen_by_next_call() {
    let shared = SharedCatalog::new(CatalogSnapshot::new("v1", vec![cisco_dot1x()]).unwrap());
    let engine = RecommendationEngine::with_defaults(&shared);

    let before = engine.generate(&scenario_a_context()).unwrap();
    shared.publish(CatalogSnapshot::new("v2", vec![cisco_dot1x(), fortinet_guest()]).unwrap());
    let after = engine.generate(&scenario_a_context()).unwrap();

    assert_eq!(before.metadata.catalog_version, "v1");
    assert_eq!(before.recommendations.len(), 1);
    assert_eq!(after.metadata.catalog_version, "v2");
    assert_eq!(after.recommendations.len(), 2);
    assert_ne!(before.metadata.catalog_fingerprint, after.metadata.catalog_fingerprint);
}

#[test]
fn test_catalog_file_round_trip_through_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"{{"version":"2024.2","templates":[
            {{"id":"aruba-guest","vendor":"Aruba","category":"Guest Access",
              "complexityLevel":"Basic","typicalDeploymentHours":16,
              "supportedUseCases":["Guest Access"]}}
        ]}}"#
    )
    .unwrap();

    let snapshot = CatalogSnapshot::load(&path).unwrap();
    let result = engine(std::sync::Arc::new(snapshot))
        .generate(&RecommendationContext::new().with_use_case("guest access"))
        .unwrap();

    assert_eq!(result.metadata.catalog_version, "2024.2");
    assert_eq!(template_ids(&result), vec!["aruba-guest"]);
    assert_eq!(
        result.recommendations[0].estimated_complexity,
        ComplexityLevel::Basic
    );
}

#[test]
fn test_missing_catalog_file_is_retryable_io() {
    let err = CatalogSnapshot::load("/nonexistent/catalog.yaml").unwrap_err();
    assert!(EngineError::from(err).is_retryable());
}

#[test]
fn test_unknown_template_fields_are_tolerated() {
    let snapshot = CatalogSnapshot::from_json_str(
        r#"[{"id":"x","vendor":"Cisco","category":"Posture","complexityLevel":"expert",
            "typicalDeploymentHours":120,"owner":"netops"}]"#,
    )
    .unwrap();
    let metadata: &TemplateMetadata = snapshot.templates()[0].metadata();
    assert_eq!(metadata.complexity_level, ComplexityLevel::Expert);
}
