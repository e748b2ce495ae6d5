//! Builder pattern for TargetingEngine

use crate::config::EngineConfig;
use crate::engine::TargetingEngine;
use crate::error::Result;
use adtarget_runtime::{CancellationPolicy, MetricsCollector};
use std::sync::Arc;
use std::time::Duration;

/// Builder for TargetingEngine
///
/// # Example
///
/// ```rust,ignore
/// use adtarget_sdk::{CancellationPolicy, TargetingEngineBuilder};
/// use std::time::Duration;
///
/// // Explicit settings
/// let engine = TargetingEngineBuilder::new()
///     .max_concurrency(32)
///     .timeout(Duration::from_millis(200))
///     .cancellation(CancellationPolicy::CancelOnDecision)
///     .build()?;
///
/// // From config/targeting.* and ADTARGET_* environment variables
/// let engine = TargetingEngineBuilder::from_env()?.build()?;
/// ```
pub struct TargetingEngineBuilder {
    config: EngineConfig,
    metrics: Option<Arc<MetricsCollector>>,
}

impl TargetingEngineBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            metrics: None,
        }
    }

    /// Start from configuration loaded from file and environment
    pub fn from_env() -> Result<Self> {
        Ok(Self::new().with_config(EngineConfig::load()?))
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Maximum predicates evaluated at once
    pub fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.evaluator.max_concurrency = max_concurrency;
        self
    }

    /// Per-call deadline
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.evaluator = self.config.evaluator.with_timeout(Some(timeout));
        self
    }

    /// Wait for predicates indefinitely
    pub fn no_timeout(mut self) -> Self {
        self.config.evaluator = self.config.evaluator.with_timeout(None);
        self
    }

    /// What to do with running predicates once the answer is known
    pub fn cancellation(mut self, policy: CancellationPolicy) -> Self {
        self.config.evaluator.cancellation = policy;
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.config.enable_metrics = enable;
        self
    }

    /// Record metrics into an existing collector
    pub fn with_metrics_collector(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the targeting engine
    pub fn build(self) -> Result<TargetingEngine> {
        match self.metrics {
            Some(metrics) => TargetingEngine::with_metrics_collector(self.config, metrics),
            None => TargetingEngine::new(self.config),
        }
    }
}

impl Default for TargetingEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
