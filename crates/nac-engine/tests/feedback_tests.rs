use nac_engine::{FeedbackGateway, InMemorySink};
use nac_model::{Ack, RecommendationId, UsageRecord};
use nac_test_utils::{engine, scenario_a_catalog, scenario_a_context};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_feedback_for_tracked_recommendation_is_accepted() {
    let result = engine(scenario_a_catalog())
        .generate(&scenario_a_context())
        .unwrap();
    let gateway = FeedbackGateway::new(InMemorySink::new());
    gateway.track(&result);

    let top = result.top().unwrap();
    let ack = gateway
        .submit_feedback(top.recommendation_id, json!({"helpful": true}))
        .unwrap();

    assert_eq!(ack, Ack::Accepted);
    let stored = gateway.sink().feedback();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].template_id, top.template_id);
    assert_eq!(stored[0].feedback, json!({"helpful": true}));
}

#[test]
fn test_released_result_rejects_feedback() {
    let result = engine(scenario_a_catalog())
        .generate(&scenario_a_context())
        .unwrap();
    let gateway = FeedbackGateway::new(InMemorySink::new());
    gateway.track(&result);

    let id = result.recommendations[1].recommendation_id;
    assert!(gateway.is_tracked(id));
    assert_eq!(gateway.release(result.result_id), 2);
    assert!(!gateway.is_tracked(id));

    let err = gateway.submit_feedback(id, json!({})).unwrap_err();
    assert_eq!(err.recommendation_id, id);
}

#[test]
fn test_release_only_affects_its_own_result() {
    let engine = engine(scenario_a_catalog());
    let first = engine.generate(&scenario_a_context()).unwrap();
    let second = engine.generate(&scenario_a_context()).unwrap();

    let gateway = FeedbackGateway::new(InMemorySink::new());
    gateway.track(&first);
    gateway.track(&second);
    gateway.release(first.result_id);

    assert!(!gateway.is_tracked(first.recommendations[0].recommendation_id));
    assert!(gateway.is_tracked(second.recommendations[0].recommendation_id));
}

#[test]
fn test_usage_links_recommendation() {
    let gateway = FeedbackGateway::new(InMemorySink::new());
    let id = RecommendationId::new();
    let record = UsageRecord::new("t1")
        .with_recommendation(id)
        .with_outcome(json!({"deployed": true}));

    assert_eq!(gateway.record_usage(record), Ack::Accepted);
    let usage = gateway.sink().usage();
    assert_eq!(usage[0].recommendation_id, Some(id));
    assert_eq!(usage[0].template_id.as_str(), "t1");
}
