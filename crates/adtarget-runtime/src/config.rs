//! Evaluator configuration

use crate::error::{EvaluationError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Semaphore;

/// What happens to still-running predicate tasks once the answer is known
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationPolicy {
    /// Every dispatched predicate runs to completion before the group is
    /// reduced. The reported rejection (or failure) is the one at the lowest
    /// predicate index.
    #[default]
    WaitForAll,

    /// Abort outstanding predicates as soon as one reports a non-TRUE result
    /// or fails. The reported reason is the first decisive result by
    /// completion order.
    CancelOnDecision,
}

/// Configuration passed explicitly to each `TargetingEvaluator`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Maximum predicate tasks running at once, shared by all calls on one
    /// evaluator
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-call deadline in milliseconds; `None` waits indefinitely
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: Option<u64>,

    #[serde(default)]
    pub cancellation: CancellationPolicy,
}

fn default_max_concurrency() -> usize {
    64
}

fn default_timeout_ms() -> Option<u64> {
    Some(1000)
}

impl EvaluatorConfig {
    pub fn new() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            timeout_ms: default_timeout_ms(),
            cancellation: CancellationPolicy::default(),
        }
    }

    /// Set the concurrency limit
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Set (or clear) the per-call timeout.
    ///
    /// Stored in whole milliseconds; a fractional millisecond rounds up so a
    /// non-zero timeout never becomes zero.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_ms =
            timeout.map(|t| u64::try_from(t.as_micros().div_ceil(1000)).unwrap_or(u64::MAX));
        self
    }

    /// Set the cancellation policy
    pub fn with_cancellation(mut self, cancellation: CancellationPolicy) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Reject settings the evaluator cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(EvaluationError::InvalidConfig(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(EvaluationError::InvalidConfig(format!(
                "max_concurrency must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if self.timeout_ms == Some(0) {
            return Err(EvaluationError::InvalidConfig(
                "timeout_ms must be greater than 0 (omit it to disable the timeout)".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
