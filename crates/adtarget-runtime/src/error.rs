//! Evaluation error types

use adtarget_core::PredicateError;
use std::time::Duration;
use thiserror::Error;

/// Fatal error for one `evaluate` call.
///
/// A genuine FALSE decision is never reported through this type; it is an
/// `EvaluationOutcome::Ineligible`.
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// A predicate returned an error
    #[error("Predicate '{predicate}' (index {index}) failed: {source}")]
    PredicateFailed {
        index: usize,
        predicate: String,
        #[source]
        source: PredicateError,
    },

    /// A predicate panicked while evaluating
    #[error("Predicate '{predicate}' (index {index}) panicked: {message}")]
    PredicatePanicked {
        index: usize,
        predicate: String,
        message: String,
    },

    /// The call deadline elapsed before every predicate reported
    #[error("Evaluation timed out after {}ms waiting on {pending:?}", .timeout.as_millis())]
    Timeout {
        timeout: Duration,
        pending: Vec<String>,
    },

    /// A predicate task was cancelled while results were being collected
    #[error("Evaluation interrupted: {0}")]
    Interrupted(String),

    /// Evaluator configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EvaluationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, EvaluationError::Timeout { .. })
    }

    /// Name of the predicate that caused the failure, when there is exactly one
    pub fn predicate_name(&self) -> Option<&str> {
        match self {
            EvaluationError::PredicateFailed { predicate, .. }
            | EvaluationError::PredicatePanicked { predicate, .. } => Some(predicate),
            _ => None,
        }
    }

    /// Short label used for error metrics
    pub fn kind(&self) -> &'static str {
        match self {
            EvaluationError::PredicateFailed { .. } => "predicate_failed",
            EvaluationError::PredicatePanicked { .. } => "predicate_panicked",
            EvaluationError::Timeout { .. } => "timeout",
            EvaluationError::Interrupted(_) => "interrupted",
            EvaluationError::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Result type for evaluator operations
pub type Result<T> = std::result::Result<T, EvaluationError>;
