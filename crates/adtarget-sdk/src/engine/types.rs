//! Response types for TargetingEngine

use crate::error::SdkError;
use adtarget_runtime::EvaluationOutcome;
use serde::Serialize;

/// Decision for one targeting group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetingResponse {
    /// Request ID (for tracking and correlation)
    pub request_id: String,

    pub targeting_group_id: String,

    pub content_id: String,

    pub outcome: EvaluationOutcome,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl TargetingResponse {
    pub fn is_eligible(&self) -> bool {
        self.outcome.is_true()
    }
}

/// Per-group entry of a batch evaluation
#[derive(Debug)]
pub struct GroupDecision {
    pub targeting_group_id: String,

    pub content_id: String,

    /// The outcome, or the failure that prevented one
    pub result: Result<EvaluationOutcome, SdkError>,
}

impl GroupDecision {
    /// True only for a successful, eligible evaluation
    pub fn is_eligible(&self) -> bool {
        matches!(&self.result, Ok(outcome) if outcome.is_true())
    }

    pub fn is_failed(&self) -> bool {
        self.result.is_err()
    }
}

/// Decisions for several targeting groups against one request
#[derive(Debug)]
pub struct BatchResponse {
    pub request_id: String,

    /// One entry per input group, in input order
    pub decisions: Vec<GroupDecision>,

    pub processing_time_ms: u64,
}

impl BatchResponse {
    /// Content ids of the eligible groups, in input order
    pub fn eligible_content_ids(&self) -> Vec<&str> {
        self.decisions
            .iter()
            .filter(|d| d.is_eligible())
            .map(|d| d.content_id.as_str())
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &GroupDecision> {
        self.decisions.iter().filter(|d| d.is_failed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adtarget_runtime::{EvaluationError, Rejection};

    fn decision(content_id: &str, result: Result<EvaluationOutcome, SdkError>) -> GroupDecision {
        GroupDecision {
            targeting_group_id: format!("tg-{}", content_id),
            content_id: content_id.to_string(),
            result,
        }
    }

    #[test]
    fn test_batch_eligible_content_ids() {
        let batch = BatchResponse {
            request_id: "tgt_test".to_string(),
            decisions: vec![
                decision("ad-1", Ok(EvaluationOutcome::Eligible)),
                decision("ad-2", Ok(EvaluationOutcome::Ineligible(Rejection::GateRejected))),
                decision(
                    "ad-3",
                    Err(SdkError::Evaluation(EvaluationError::Interrupted(
                        "cancelled".to_string(),
                    ))),
                ),
                decision("ad-4", Ok(EvaluationOutcome::Eligible)),
            ],
            processing_time_ms: 1,
        };

        assert_eq!(batch.eligible_content_ids(), vec!["ad-1", "ad-4"]);
        assert_eq!(batch.failures().count(), 1);
        assert!(batch.decisions[2].is_failed());
        assert!(!batch.decisions[2].is_eligible());
    }

    #[test]
    fn test_response_serializes() {
        let response = TargetingResponse {
            request_id: "tgt_20260101000000_abcdef".to_string(),
            targeting_group_id: "tg-1".to_string(),
            content_id: "ad-1".to_string(),
            outcome: EvaluationOutcome::Eligible,
            processing_time_ms: 3,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["outcome"], "eligible");
        assert_eq!(json["content_id"], "ad-1");
        assert!(response.is_eligible());
    }
}
