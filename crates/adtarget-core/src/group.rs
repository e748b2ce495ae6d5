//! Targeting groups

use crate::predicate::TargetingPredicate;
use std::fmt;
use std::sync::Arc;

/// The rule set gating one advertisement: an ordered list of predicates that
/// must all hold for the advertisement to be eligible.
#[derive(Clone)]
pub struct TargetingGroup {
    /// Targeting group ID
    pub targeting_group_id: String,

    /// Advertisement content this group gates
    pub content_id: String,

    /// Historical click-through rate, carried for downstream selection
    pub click_through_rate: f64,

    predicates: Vec<Arc<dyn TargetingPredicate>>,
}

impl TargetingGroup {
    /// Create a group with no predicates (always eligible once gated)
    pub fn new(targeting_group_id: impl Into<String>, content_id: impl Into<String>) -> Self {
        Self {
            targeting_group_id: targeting_group_id.into(),
            content_id: content_id.into(),
            click_through_rate: 0.0,
            predicates: Vec::new(),
        }
    }

    /// Append a predicate
    pub fn with_predicate(mut self, predicate: impl TargetingPredicate + 'static) -> Self {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Append an already shared predicate
    pub fn with_shared_predicate(mut self, predicate: Arc<dyn TargetingPredicate>) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Set the click-through rate
    pub fn with_click_through_rate(mut self, ctr: f64) -> Self {
        self.click_through_rate = ctr;
        self
    }

    /// Predicates in evaluation (and inspection) order
    pub fn predicates(&self) -> &[Arc<dyn TargetingPredicate>] {
        &self.predicates
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Debug for TargetingGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.predicates.iter().map(|p| p.name()).collect();
        f.debug_struct("TargetingGroup")
            .field("targeting_group_id", &self.targeting_group_id)
            .field("content_id", &self.content_id)
            .field("click_through_rate", &self.click_through_rate)
            .field("predicates", &names)
            .finish()
    }
}
