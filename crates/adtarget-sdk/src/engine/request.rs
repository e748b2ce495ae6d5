//! Evaluator bound to one request context

use super::engine::TargetingEngine;
use super::types::{BatchResponse, TargetingResponse};
use crate::error::Result;
use adtarget_core::{RequestContext, TargetingGroup};
use std::sync::Arc;

/// Evaluates any number of targeting groups against a single request.
///
/// Cheap to create; holds a shared reference to the request context and
/// borrows the engine.
pub struct RequestEvaluator<'a> {
    engine: &'a TargetingEngine,
    ctx: Arc<RequestContext>,
}

impl<'a> RequestEvaluator<'a> {
    pub(crate) fn new(engine: &'a TargetingEngine, ctx: Arc<RequestContext>) -> Self {
        Self { engine, ctx }
    }

    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }

    /// Decide whether one targeting group holds for the bound request
    pub async fn evaluate(&self, group: &TargetingGroup) -> Result<TargetingResponse> {
        self.engine.evaluate(&self.ctx, group).await
    }

    /// Evaluate several groups for the bound request
    pub async fn evaluate_all(&self, groups: &[TargetingGroup]) -> BatchResponse {
        self.engine.evaluate_all(&self.ctx, groups).await
    }
}
