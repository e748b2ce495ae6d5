//! Basic targeting example
//!
//! This example demonstrates:
//! - Building a TargetingEngine
//! - Describing a targeting group with closures and a custom async predicate
//! - Evaluating it for signed-in and anonymous requests
//! - Handling predicate failures and timeouts

use adtarget_sdk::{
    FnPredicate, Inverted, Metrics, PredicateError, PredicateResult, RequestContext,
    TargetingEngineBuilder, TargetingGroup, TargetingPredicate,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Audience segment membership, looked up with some latency
struct SegmentPredicate {
    name: String,
    members: HashSet<String>,
    latency: Duration,
}

impl SegmentPredicate {
    fn new(segment: &str, members: &[&str], latency: Duration) -> Self {
        Self {
            name: format!("segment:{}", segment),
            members: members.iter().map(|m| m.to_string()).collect(),
            latency,
        }
    }
}

#[async_trait]
impl TargetingPredicate for SegmentPredicate {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, ctx: &RequestContext) -> Result<PredicateResult, PredicateError> {
        tokio::time::sleep(self.latency).await;
        let customer_id = ctx
            .customer_id
            .as_deref()
            .ok_or_else(|| PredicateError::MissingAttribute("customer_id".to_string()))?;
        Ok(PredicateResult::from(self.members.contains(customer_id)))
    }
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adtarget_sdk=info,adtarget_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    println!("=== Basic Targeting Example ===\n");

    let engine = TargetingEngineBuilder::new()
        .max_concurrency(16)
        .timeout(Duration::from_millis(200))
        .enable_metrics(true)
        .build()?;

    let group = TargetingGroup::new("tg-running-shoes", "ad-running-shoes-042")
        .with_click_through_rate(0.031)
        .with_predicate(FnPredicate::new("in_us", |ctx: &RequestContext| {
            Ok(PredicateResult::from(ctx.marketplace_id.as_deref() == Some("US")))
        }))
        .with_predicate(Inverted::new(FnPredicate::new(
            "is_employee",
            |ctx: &RequestContext| {
                Ok(PredicateResult::from(
                    ctx.attribute("employee").and_then(|v| v.as_bool()) == Some(true),
                ))
            },
        )))
        .with_predicate(SegmentPredicate::new(
            "runners",
            &["c-100", "c-200"],
            Duration::from_millis(20),
        ));

    let requests = [
        ("runner in US", RequestContext::new().with_customer_id("c-100").with_marketplace_id("US")),
        ("runner in DE", RequestContext::new().with_customer_id("c-200").with_marketplace_id("DE")),
        ("non-runner", RequestContext::new().with_customer_id("c-300").with_marketplace_id("US")),
        ("anonymous", RequestContext::new().with_marketplace_id("US")),
    ];

    for (label, ctx) in requests {
        let response = engine.evaluate(&Arc::new(ctx), &group).await?;
        println!(
            "{:<14} -> {} ({})",
            label,
            if response.is_eligible() { "SHOW" } else { "skip" },
            serde_json::to_string(&response.outcome)?
        );
    }

    // A slow lookup exceeds the deadline and is reported as an error, never as "skip"
    let slow_group = TargetingGroup::new("tg-slow", "ad-slow").with_predicate(SegmentPredicate::new(
        "slow_segment",
        &["c-100"],
        Duration::from_secs(2),
    ));
    let ctx = Arc::new(RequestContext::new().with_customer_id("c-100"));
    match engine.evaluate(&ctx, &slow_group).await {
        Ok(response) => println!("\nunexpected response: {:?}", response),
        Err(e) => println!("\nslow group failed: {}", e),
    }

    let snapshot = engine.metrics().snapshot();
    println!("\nMetrics:");
    for (name, value) in &snapshot.counters {
        println!("  {}: {}", name, value);
    }
    println!(
        "  evaluations recorded: {}",
        engine.metrics().counter("evaluations_total").get()
    );

    Ok(())
}
