//! Evaluation outcome types

use adtarget_core::PredicateResult;
use serde::{Deserialize, Serialize};

/// Aggregate decision for one (request, targeting group) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationOutcome {
    /// Gate passed and every predicate returned TRUE
    Eligible,

    /// The group does not hold for this request
    Ineligible(Rejection),
}

/// Why a group was found ineligible
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// The request is not from a recognized customer; no predicate ran
    GateRejected,

    /// A predicate returned something other than TRUE
    PredicateRejected {
        index: usize,
        predicate: String,
        result: PredicateResult,
    },
}

impl EvaluationOutcome {
    pub fn is_true(&self) -> bool {
        matches!(self, EvaluationOutcome::Eligible)
    }

    /// Collapse to the two-valued predicate result
    pub fn as_predicate_result(&self) -> PredicateResult {
        PredicateResult::from(self.is_true())
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            EvaluationOutcome::Eligible => None,
            EvaluationOutcome::Ineligible(rejection) => Some(rejection),
        }
    }

    /// Short label used for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            EvaluationOutcome::Eligible => "eligible",
            EvaluationOutcome::Ineligible(Rejection::GateRejected) => "gate_rejected",
            EvaluationOutcome::Ineligible(Rejection::PredicateRejected { .. }) => "ineligible",
        }
    }
}

impl From<EvaluationOutcome> for bool {
    fn from(outcome: EvaluationOutcome) -> Self {
        outcome.is_true()
    }
}
