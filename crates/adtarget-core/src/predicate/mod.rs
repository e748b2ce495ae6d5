//! Targeting predicates
//!
//! A predicate is one independent eligibility rule. Implementations are
//! supplied by callers (database lookups, geo checks, ...) and are treated as
//! black boxes: they may be slow or fail, and they may be invoked concurrently
//! against the same request context.

mod adapters;

pub use adapters::{ConstantPredicate, FnPredicate, Inverted};

use crate::context::RequestContext;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of evaluating one predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredicateResult {
    True,
    False,
    /// The predicate could not reach a decision for this request
    Indeterminate,
}

impl PredicateResult {
    /// Only `True` counts as satisfied
    pub fn is_true(self) -> bool {
        matches!(self, PredicateResult::True)
    }

    /// Swap `True` and `False`; `Indeterminate` stays indeterminate
    pub fn invert(self) -> Self {
        match self {
            PredicateResult::True => PredicateResult::False,
            PredicateResult::False => PredicateResult::True,
            PredicateResult::Indeterminate => PredicateResult::Indeterminate,
        }
    }
}

impl From<bool> for PredicateResult {
    fn from(b: bool) -> Self {
        if b {
            PredicateResult::True
        } else {
            PredicateResult::False
        }
    }
}

impl fmt::Display for PredicateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateResult::True => write!(f, "TRUE"),
            PredicateResult::False => write!(f, "FALSE"),
            PredicateResult::Indeterminate => write!(f, "INDETERMINATE"),
        }
    }
}

/// One eligibility rule evaluated against a request context.
///
/// Implementations must not depend on evaluation order or on being evaluated
/// at all, and must not mutate shared state reachable from the context.
#[async_trait]
pub trait TargetingPredicate: Send + Sync {
    /// Name used in logs, rejection reasons and errors
    fn name(&self) -> &str;

    /// Evaluate the predicate for one request
    async fn evaluate(&self, ctx: &RequestContext) -> Result<PredicateResult>;
}
