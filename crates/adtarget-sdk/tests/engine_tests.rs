//! Integration tests for TargetingEngine

mod common;

use adtarget_sdk::{
    CancellationPolicy, ConstantPredicate, EngineConfig, EvaluationError, EvaluationOutcome,
    FnPredicate, Inverted, Metrics, PredicateResult, Rejection, RequestContext, SdkError,
    TargetingEngineBuilder, TargetingGroup,
};
use common::{anonymous, customer, engine, SlowPredicate};
use std::io::Write;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn prime_group() -> TargetingGroup {
    TargetingGroup::new("tg-prime", "ad-prime")
        .with_click_through_rate(0.042)
        .with_predicate(FnPredicate::new("is_prime", |ctx: &RequestContext| {
            Ok(PredicateResult::from(
                ctx.attribute("prime").and_then(|v| v.as_bool()) == Some(true),
            ))
        }))
}

#[tokio::test]
async fn test_evaluate_returns_response() {
    let engine = engine();
    let group = TargetingGroup::new("tg-1", "ad-1").with_predicate(ConstantPredicate::always_true());

    let response = engine.evaluate(&customer("c-1"), &group).await.unwrap();

    assert!(response.is_eligible());
    assert_eq!(response.targeting_group_id, "tg-1");
    assert_eq!(response.content_id, "ad-1");
    assert!(response.request_id.starts_with("tgt_"));
}

#[tokio::test]
async fn test_anonymous_request_skips_predicates() {
    let engine = engine();
    let predicate = SlowPredicate::new("slow", Duration::ZERO, PredicateResult::True);
    let calls = predicate.calls();
    let group = TargetingGroup::new("tg-1", "ad-1").with_predicate(predicate);

    let response = engine.evaluate(&anonymous(), &group).await.unwrap();

    assert_eq!(
        response.outcome,
        EvaluationOutcome::Ineligible(Rejection::GateRejected)
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_inverted_predicate_rejects() {
    let engine = engine();
    let group = TargetingGroup::new("tg-1", "ad-1")
        .with_predicate(ConstantPredicate::always_true())
        .with_predicate(Inverted::new(ConstantPredicate::always_true()));

    let response = engine.evaluate(&customer("c-1"), &group).await.unwrap();

    match response.outcome {
        EvaluationOutcome::Ineligible(Rejection::PredicateRejected {
            index, predicate, ..
        }) => {
            assert_eq!(index, 1);
            assert_eq!(predicate, "not(always_true)");
        }
        other => panic!("expected predicate rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_predicate_failure_surfaces_as_error() {
    let engine = engine();
    let group = TargetingGroup::new("tg-1", "ad-1")
        .with_predicate(ConstantPredicate::always_false())
        .with_predicate(SlowPredicate::failing("lookup", "segment service unavailable"));

    let err = engine.evaluate(&customer("c-1"), &group).await.unwrap_err();

    match err.as_evaluation() {
        Some(EvaluationError::PredicateFailed { index, predicate, .. }) => {
            assert_eq!(*index, 1);
            assert_eq!(predicate, "lookup");
        }
        other => panic!("expected predicate failure, got {:?}", other),
    }
    assert!(err.to_string().contains("lookup"));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_reported() {
    let engine = TargetingEngineBuilder::new()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let group = TargetingGroup::new("tg-1", "ad-1")
        .with_predicate(ConstantPredicate::always_true())
        .with_predicate(SlowPredicate::new(
            "slow",
            Duration::from_secs(5),
            PredicateResult::True,
        ));

    let err = engine.evaluate(&customer("c-1"), &group).await.unwrap_err();

    match err {
        SdkError::Evaluation(EvaluationError::Timeout { timeout, pending }) => {
            assert_eq!(timeout, Duration::from_millis(100));
            assert_eq!(pending, vec!["slow".to_string()]);
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(engine.evaluator().in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_on_decision_returns_early() {
    let engine = TargetingEngineBuilder::new()
        .no_timeout()
        .cancellation(CancellationPolicy::CancelOnDecision)
        .build()
        .unwrap();
    let group = TargetingGroup::new("tg-1", "ad-1")
        .with_predicate(ConstantPredicate::always_false())
        .with_predicate(SlowPredicate::new(
            "slow",
            Duration::from_secs(60),
            PredicateResult::True,
        ));

    let start = tokio::time::Instant::now();
    let response = engine.evaluate(&customer("c-1"), &group).await.unwrap();

    assert!(!response.is_eligible());
    assert!(start.elapsed() < Duration::from_secs(60));
    assert_eq!(engine.evaluator().in_flight(), 0);
}

#[tokio::test]
async fn test_evaluate_all_preserves_order() {
    let engine = engine();
    let groups = vec![
        prime_group(),
        TargetingGroup::new("tg-open", "ad-open").with_predicate(ConstantPredicate::always_true()),
        TargetingGroup::new("tg-broken", "ad-broken")
            .with_predicate(SlowPredicate::failing("lookup", "boom")),
        TargetingGroup::new("tg-closed", "ad-closed")
            .with_predicate(ConstantPredicate::always_false()),
    ];
    let ctx = Arc::new(
        RequestContext::new()
            .with_customer_id("c-1")
            .with_attribute("prime", true),
    );

    let batch = engine.evaluate_all(&ctx, &groups).await;

    let ids: Vec<&str> = batch
        .decisions
        .iter()
        .map(|d| d.targeting_group_id.as_str())
        .collect();
    assert_eq!(ids, vec!["tg-prime", "tg-open", "tg-broken", "tg-closed"]);
    assert_eq!(batch.eligible_content_ids(), vec!["ad-prime", "ad-open"]);
    assert_eq!(batch.failures().count(), 1);
    assert!(batch.decisions[2].is_failed());
}

#[tokio::test]
async fn test_for_request_reuses_context() {
    let engine = engine();
    let request = engine.for_request(
        RequestContext::new()
            .with_customer_id("c-1")
            .with_attribute("prime", false),
    );

    assert_eq!(request.context().customer_id.as_deref(), Some("c-1"));

    let response = request.evaluate(&prime_group()).await.unwrap();
    assert!(!response.is_eligible());

    let open = TargetingGroup::new("tg-open", "ad-open");
    let batch = request.evaluate_all(&[prime_group(), open]).await;
    assert_eq!(batch.eligible_content_ids(), vec!["ad-open"]);
}

#[tokio::test]
async fn test_metrics_are_collected() {
    let engine = engine();
    let group = TargetingGroup::new("tg-1", "ad-1").with_predicate(ConstantPredicate::always_true());

    engine.evaluate(&customer("c-1"), &group).await.unwrap();
    engine.evaluate(&anonymous(), &group).await.unwrap();

    let metrics = engine.metrics();
    assert_eq!(metrics.counter("evaluations_total").get(), 2);
    assert_eq!(metrics.counter("eligible_total").get(), 1);
    assert_eq!(metrics.counter("gate_rejections_total").get(), 1);
}

#[tokio::test]
async fn test_engine_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "evaluator:\n  max_concurrency: 2\n  timeout_ms: 250\n  cancellation: cancel_on_decision\nenable_metrics: false"
    )
    .unwrap();

    let config = EngineConfig::from_yaml_file(file.path()).unwrap();
    let engine = TargetingEngineBuilder::new().with_config(config).build().unwrap();

    assert_eq!(engine.config().evaluator.max_concurrency, 2);
    assert_eq!(engine.evaluator().available_permits(), 2);
    assert_eq!(
        engine.config().evaluator.timeout(),
        Some(Duration::from_millis(250))
    );
    assert!(engine.evaluator().metrics().is_none());
}

#[test]
fn test_invalid_yaml_config_is_rejected() {
    let err = EngineConfig::from_yaml_str("evaluator:\n  max_concurrency: 0\n").unwrap_err();
    assert!(matches!(err, SdkError::Config(_)));
}
