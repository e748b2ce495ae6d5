//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use adtarget_sdk::{
    PredicateError, PredicateResult, RequestContext, TargetingEngine, TargetingEngineBuilder,
    TargetingPredicate,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Predicate that sleeps, then returns a fixed result or fails
pub struct SlowPredicate {
    name: String,
    delay: Duration,
    result: Result<PredicateResult, String>,
    calls: Arc<AtomicUsize>,
}

impl SlowPredicate {
    pub fn new(name: &str, delay: Duration, result: PredicateResult) -> Self {
        Self {
            name: name.to_string(),
            delay,
            result: Ok(result),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(name: &str, message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            ..Self::new(name, Duration::ZERO, PredicateResult::True)
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl TargetingPredicate for SlowPredicate {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, _ctx: &RequestContext) -> Result<PredicateResult, PredicateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone().map_err(PredicateError::Failed)
    }
}

/// Context for a signed-in customer
pub fn customer(customer_id: &str) -> Arc<RequestContext> {
    Arc::new(
        RequestContext::new()
            .with_customer_id(customer_id)
            .with_marketplace_id("US"),
    )
}

/// Context for a request without a customer
pub fn anonymous() -> Arc<RequestContext> {
    Arc::new(RequestContext::new().with_marketplace_id("US"))
}

/// Engine without a deadline, for tests that do not exercise timeouts
pub fn engine() -> TargetingEngine {
    TargetingEngineBuilder::new()
        .no_timeout()
        .build()
        .expect("default engine should build")
}
