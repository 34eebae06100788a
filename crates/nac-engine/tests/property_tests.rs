use nac_engine::{validate, IndexedTemplate, Scorer};
use nac_model::{ComplexityLevel, EngineConfig, RecommendationContext, ScoreDimension, TemplateMetadata};
use nac_test_utils::{engine_with, large_catalog, scenario_a_context};
use proptest::prelude::*;

const VENDORS: [&str; 4] = ["Cisco", "Aruba", "Fortinet", "Generic"];
const USE_CASES: [&str; 5] = [
    "Device Authentication",
    "Guest Access",
    "IoT Profiling",
    "Posture Assessment",
    "BYOD Onboarding",
];
const FRAMEWORKS: [&str; 3] = ["HIPAA", "PCI-DSS", "SOX"];
const NETWORKS: [&str; 4] = ["Simple", "Moderate", "Complex", "Very Complex"];
const EXPERTISE: [&str; 4] = ["beginner", "intermediate", "advanced", "expert"];
const TIMELINES: [&str; 4] = ["urgent", "fast", "normal", "extended"];
const LEVELS: [ComplexityLevel; 4] = [
    ComplexityLevel::Basic,
    ComplexityLevel::Intermediate,
    ComplexityLevel::Advanced,
    ComplexityLevel::Expert,
];

fn subset(items: &'static [&'static str]) -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(items, 0..=items.len())
}

prop_compose! {
    fn arb_context()(
        vendors in subset(&VENDORS),
        use_cases in subset(&USE_CASES),
        frameworks in subset(&FRAMEWORKS),
        network in proptest::option::of(0..NETWORKS.len()),
        expertise in proptest::option::of(0..EXPERTISE.len()),
        timeline in proptest::option::of(0..TIMELINES.len()),
    ) -> RecommendationContext {
        let mut ctx = RecommendationContext::new().with_industry("Retail");
        for v in vendors { ctx = ctx.with_vendor(v); }
        for u in use_cases { ctx = ctx.with_use_case(u); }
        for f in frameworks { ctx = ctx.with_compliance(f); }
        if let Some(n) = network { ctx = ctx.with_network_complexity(NETWORKS[n]); }
        if let Some(e) = expertise { ctx = ctx.with_expertise(EXPERTISE[e]); }
        if let Some(t) = timeline { ctx = ctx.with_timeline(TIMELINES[t]); }
        ctx
    }
}

prop_compose! {
    fn arb_template()(
        vendor in 0..VENDORS.len(),
        level in 0..LEVELS.len(),
        hours in 0.0..2000.0f64,
        use_cases in subset(&USE_CASES),
        frameworks in subset(&FRAMEWORKS),
    ) -> TemplateMetadata {
        let mut t = TemplateMetadata::new("prop", VENDORS[vendor], "802.1X", LEVELS[level], hours);
        for u in use_cases { t = t.with_use_case(u); }
        for f in frameworks { t = t.with_compliance(f); }
        t
    }
}

proptest! {
    #[test]
    fn prop_scores_are_bounded(ctx in arb_context(), template in arb_template()) {
        let valid = validate(&ctx).unwrap();
        let score = Scorer::new(&EngineConfig::default()).score(&valid, &IndexedTemplate::new(template));

        prop_assert!((0.0..=1.0).contains(&score.score));
        for sub in &score.breakdown {
            prop_assert!((0.0..=1.0).contains(&sub.value));
        }
        let total: f64 = score.breakdown.iter().map(|s| s.contribution).sum();
        prop_assert!((total - score.score).abs() < 1e-9);
    }

    #[test]
    fn prop_more_use_case_coverage_never_lowers_score(
        ctx in arb_context(),
        template in arb_template(),
        extra in 0..USE_CASES.len(),
    ) {
        let valid = validate(&ctx).unwrap();
        let scorer = Scorer::new(&EngineConfig::default());

        let before = scorer.score(&valid, &IndexedTemplate::new(template.clone()));
        let after = scorer.score(&valid, &IndexedTemplate::new(template.with_use_case(USE_CASES[extra])));

        prop_assert!(after.score + 1e-12 >= before.score);
    }

    #[test]
    fn prop_requesting_a_supported_use_case_never_lowers_coverage(
        ctx in arb_context(),
        template in arb_template(),
        extra in 0..USE_CASES.len(),
    ) {
        let scorer = Scorer::new(&EngineConfig::default());
        let template = IndexedTemplate::new(template.with_use_case(USE_CASES[extra]));
        let coverage = |ctx: &RecommendationContext| {
            let valid = validate(ctx).unwrap();
            scorer
                .score(&valid, &template)
                .sub_score(ScoreDimension::UseCaseCoverage)
                .map(|s| s.value)
                .unwrap()
        };

        let before = coverage(&ctx);
        let after = coverage(&ctx.clone().with_use_case(USE_CASES[extra]));
        prop_assert!(after + 1e-12 >= before);
    }

    #[test]
    fn prop_reasons_and_risks_follow_thresholds(ctx in arb_context(), template in arb_template()) {
        let valid = validate(&ctx).unwrap();
        let score = Scorer::new(&EngineConfig::default()).score(&valid, &IndexedTemplate::new(template));

        let strong = score.breakdown.iter().filter(|s| s.value > 0.7).count();
        let weak = score.breakdown.iter().filter(|s| s.value < 0.4).count();
        prop_assert_eq!(score.reasons.len(), strong);
        prop_assert_eq!(score.risk_factors.len(), weak);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_parallel_and_sequential_scoring_agree(size in 1..80usize, ctx in arb_context()) {
        let catalog = large_catalog(size);
        let parallel = engine_with(catalog.clone(), EngineConfig::default().with_parallel_threshold(0));
        let sequential = engine_with(catalog, EngineConfig::default().with_parallel_threshold(usize::MAX));

        let a = parallel.generate(&ctx).unwrap();
        let b = sequential.generate(&ctx).unwrap();

        let key = |r: &nac_model::SmartRecommendationResult| {
            r.recommendations
                .iter()
                .map(|x| (x.template_id.clone(), x.score.to_bits()))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(key(&a), key(&b));
        prop_assert_eq!(a.context_analysis, b.context_analysis);
        prop_assert_eq!(a.implementation_strategy, b.implementation_strategy);
    }
}

#[test]
fn test_default_context_fixture_validates() {
    assert!(validate(&scenario_a_context()).is_ok());
}
