//! Common test utilities for evaluator integration tests

#![allow(dead_code)]

use adtarget_core::{PredicateError, PredicateResult, RequestContext, TargetingPredicate};
use adtarget_runtime::{EvaluatorConfig, TargetingEvaluator};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What a mock predicate does once its delay has elapsed
#[derive(Clone)]
pub enum Behavior {
    Return(PredicateResult),
    Fail(String),
    Panic(String),
}

/// Tracks how many mock predicates run at the same time
#[derive(Default)]
pub struct ConcurrencyGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyGauge {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Counters shared between a mock predicate and the test that owns it
#[derive(Clone, Default)]
pub struct Probe {
    invocations: Arc<AtomicUsize>,
    completions: Arc<AtomicUsize>,
}

impl Probe {
    /// Times `evaluate` was entered
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Times `evaluate` ran to the end (not aborted mid-flight)
    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }
}

/// Scriptable predicate that records its invocations
pub struct MockPredicate {
    name: String,
    behavior: Behavior,
    delay: Duration,
    probe: Probe,
    gauge: Option<Arc<ConcurrencyGauge>>,
}

impl MockPredicate {
    pub fn returning(name: &str, result: PredicateResult) -> Self {
        Self {
            name: name.to_string(),
            behavior: Behavior::Return(result),
            delay: Duration::ZERO,
            probe: Probe::default(),
            gauge: None,
        }
    }

    pub fn truthy(name: &str) -> Self {
        Self::returning(name, PredicateResult::True)
    }

    pub fn falsy(name: &str) -> Self {
        Self::returning(name, PredicateResult::False)
    }

    pub fn failing(name: &str, message: &str) -> Self {
        Self {
            behavior: Behavior::Fail(message.to_string()),
            ..Self::truthy(name)
        }
    }

    pub fn panicking(name: &str, message: &str) -> Self {
        Self {
            behavior: Behavior::Panic(message.to_string()),
            ..Self::truthy(name)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_gauge(mut self, gauge: Arc<ConcurrencyGauge>) -> Self {
        self.gauge = Some(gauge);
        self
    }

    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }
}

#[async_trait]
impl TargetingPredicate for MockPredicate {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, _ctx: &RequestContext) -> adtarget_core::Result<PredicateResult> {
        self.probe.invocations.fetch_add(1, Ordering::SeqCst);
        if let Some(gauge) = &self.gauge {
            gauge.enter();
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(gauge) = &self.gauge {
            gauge.exit();
        }
        self.probe.completions.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            Behavior::Return(result) => Ok(*result),
            Behavior::Fail(message) => Err(PredicateError::failed(message.clone())),
            Behavior::Panic(message) => panic!("{}", message),
        }
    }
}

pub fn recognized_context() -> Arc<RequestContext> {
    Arc::new(
        RequestContext::new()
            .with_customer_id("A2Z9CUSTOMER")
            .with_marketplace_id("ATVPDKIKX0DER")
            .with_session_id("session-123"),
    )
}

pub fn anonymous_context() -> Arc<RequestContext> {
    Arc::new(RequestContext::new().with_session_id("session-456"))
}

/// Evaluator without a deadline
pub fn evaluator() -> TargetingEvaluator {
    evaluator_with(EvaluatorConfig::new().with_timeout(None))
}

pub fn evaluator_with(config: EvaluatorConfig) -> TargetingEvaluator {
    TargetingEvaluator::new(config).expect("valid evaluator config")
}
