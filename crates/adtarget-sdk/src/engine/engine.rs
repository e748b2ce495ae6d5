//! Core TargetingEngine implementation

use super::request::RequestEvaluator;
use super::types::{BatchResponse, GroupDecision, TargetingResponse};
use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use adtarget_core::{RequestContext, TargetingGroup};
use adtarget_runtime::{MetricsCollector, TargetingEvaluator};
use std::sync::Arc;
use std::time::Instant;

pub struct TargetingEngine {
    /// Evaluator shared by every request
    evaluator: TargetingEvaluator,

    /// Metrics collector
    metrics: Arc<MetricsCollector>,

    /// Configuration
    config: EngineConfig,
}

impl TargetingEngine {
    /// Generate a unique request ID
    /// Format: tgt_YYYYMMDDHHmmss_xxxxxx
    /// Example: tgt_20231209143052_a3f2e1
    pub(crate) fn generate_request_id() -> String {
        use chrono::Utc;
        use rand::Rng;

        let datetime_str = Utc::now().format("%Y%m%d%H%M%S").to_string();
        let random: u32 = rand::thread_rng().gen_range(0..0xFFFFFF);

        format!("tgt_{}_{:06x}", datetime_str, random)
    }

    /// Create a new targeting engine from configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_metrics_collector(config, Arc::new(MetricsCollector::new()))
    }

    /// Create a new targeting engine recording into an existing collector
    pub fn with_metrics_collector(
        config: EngineConfig,
        metrics: Arc<MetricsCollector>,
    ) -> Result<Self> {
        let evaluator = TargetingEvaluator::new(config.evaluator.clone())
            .map_err(|e| SdkError::Config(e.to_string()))?;
        let evaluator = if config.enable_metrics {
            evaluator.with_metrics(Arc::clone(&metrics))
        } else {
            evaluator
        };

        tracing::info!(
            "Targeting engine initialized (max_concurrency={}, timeout_ms={:?}, cancellation={:?})",
            config.evaluator.max_concurrency,
            config.evaluator.timeout_ms,
            config.evaluator.cancellation
        );

        Ok(Self {
            evaluator,
            metrics,
            config,
        })
    }

    /// Decide whether one targeting group holds for a request
    pub async fn evaluate(
        &self,
        ctx: &Arc<RequestContext>,
        group: &TargetingGroup,
    ) -> Result<TargetingResponse> {
        let request_id = Self::generate_request_id();
        let start = Instant::now();

        let outcome = self.evaluator.evaluate(ctx, group).await?;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            "[{}] targeting group '{}' (content '{}'): {}",
            request_id,
            group.targeting_group_id,
            group.content_id,
            outcome.label()
        );

        Ok(TargetingResponse {
            request_id,
            targeting_group_id: group.targeting_group_id.clone(),
            content_id: group.content_id.clone(),
            outcome,
            processing_time_ms,
        })
    }

    /// Evaluate candidate groups one after another for the same request.
    ///
    /// A failing group does not stop the batch; its entry carries the error.
    pub async fn evaluate_all(
        &self,
        ctx: &Arc<RequestContext>,
        groups: &[TargetingGroup],
    ) -> BatchResponse {
        let request_id = Self::generate_request_id();
        let start = Instant::now();

        let mut decisions = Vec::with_capacity(groups.len());
        for group in groups {
            let result = self
                .evaluator
                .evaluate(ctx, group)
                .await
                .map_err(SdkError::from);
            decisions.push(GroupDecision {
                targeting_group_id: group.targeting_group_id.clone(),
                content_id: group.content_id.clone(),
                result,
            });
        }

        let response = BatchResponse {
            request_id,
            decisions,
            processing_time_ms: start.elapsed().as_millis() as u64,
        };
        tracing::debug!(
            "[{}] evaluated {} targeting groups: {} eligible, {} failed",
            response.request_id,
            groups.len(),
            response.eligible_content_ids().len(),
            response.failures().count()
        );
        response
    }

    /// Bind a request context for repeated evaluations
    pub fn for_request(&self, ctx: impl Into<Arc<RequestContext>>) -> RequestEvaluator<'_> {
        RequestEvaluator::new(self, ctx.into())
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &TargetingEvaluator {
        &self.evaluator
    }
}
