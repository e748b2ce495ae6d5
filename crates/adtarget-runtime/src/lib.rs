//! AdTarget Runtime - Concurrent evaluation of targeting groups
//!
//! This crate provides the evaluator that decides whether a targeting group
//! holds for a request: it gates on the recognized-customer flag, fans the
//! group's predicates out onto a bounded set of tokio tasks, and reduces their
//! results (in predicate order) to a single eligible/ineligible outcome.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod observability;

// Re-export main types
pub use config::{CancellationPolicy, EvaluatorConfig};
pub use error::{EvaluationError, Result};
pub use evaluator::{EvaluationOutcome, Rejection, TargetingEvaluator};
pub use observability::{Counter, Histogram, Metrics, MetricsCollector, MetricsSnapshot};
