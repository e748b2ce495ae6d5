//! TargetingEvaluator - decides whether a targeting group holds for a request
//!
//! The module is organized into:
//! - `outcome`: the eligible/ineligible decision and its rejection reason
//! - `task`: the per-predicate task body and its resource guard
//! - `engine`: gate check, fan-out, fan-in and reduction

mod engine;
mod outcome;
mod task;

pub use engine::TargetingEvaluator;
pub use outcome::{EvaluationOutcome, Rejection};
