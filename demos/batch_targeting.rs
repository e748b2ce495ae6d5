//! Batch targeting example
//!
//! This example demonstrates:
//! - Loading engine configuration from `config/targeting.*` and `ADTARGET_*` variables
//! - Binding one request context and evaluating several candidate groups
//! - Picking the eligible content with the best click-through rate

use adtarget_sdk::{
    ConstantPredicate, FnPredicate, PredicateError, PredicateResult, RequestContext,
    TargetingEngineBuilder, TargetingGroup,
};

fn attribute_equals(key: &'static str, expected: &'static str) -> FnPredicate<
    impl Fn(&RequestContext) -> Result<PredicateResult, PredicateError> + Send + Sync,
> {
    FnPredicate::new(format!("{}={}", key, expected), move |ctx: &RequestContext| {
        Ok(PredicateResult::from(
            ctx.require_attribute(key)?.as_str() == Some(expected),
        ))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== Batch Targeting Example ===\n");

    // Falls back to defaults when no config file or variables are present
    let engine = TargetingEngineBuilder::from_env()?.build()?;
    println!("Engine configuration: {:?}\n", engine.config());

    let candidates = vec![
        TargetingGroup::new("tg-mobile", "ad-mobile-app")
            .with_click_through_rate(0.052)
            .with_predicate(attribute_equals("device", "mobile")),
        TargetingGroup::new("tg-desktop", "ad-desktop-deal")
            .with_click_through_rate(0.047)
            .with_predicate(attribute_equals("device", "desktop")),
        TargetingGroup::new("tg-tier", "ad-gold-members")
            .with_click_through_rate(0.061)
            .with_predicate(attribute_equals("tier", "gold")),
        TargetingGroup::new("tg-house", "ad-house")
            .with_click_through_rate(0.010)
            .with_predicate(ConstantPredicate::always_true()),
    ];

    let request = engine.for_request(
        RequestContext::new()
            .with_customer_id("c-777")
            .with_marketplace_id("US")
            .with_attribute("device", "mobile"),
    );

    let batch = request.evaluate_all(&candidates).await;
    println!("Request {} ({}ms):", batch.request_id, batch.processing_time_ms);
    for decision in &batch.decisions {
        let status = match &decision.result {
            Ok(outcome) => outcome.label().to_string(),
            Err(e) => format!("error: {}", e),
        };
        println!("  {:<12} {:<18} {}", decision.targeting_group_id, decision.content_id, status);
    }

    let best = candidates
        .iter()
        .zip(&batch.decisions)
        .filter(|(_, decision)| decision.is_eligible())
        .max_by(|(a, _), (b, _)| a.click_through_rate.total_cmp(&b.click_through_rate));

    match best {
        Some((group, _)) => println!("\nServing {} (ctr {:.3})", group.content_id, group.click_through_rate),
        None => println!("\nNo eligible content"),
    }

    Ok(())
}
