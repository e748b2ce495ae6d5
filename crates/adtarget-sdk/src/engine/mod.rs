//! TargetingEngine - Main API for eligibility decisions
//!
//! The module is organized into:
//! - `types`: response types (TargetingResponse, GroupDecision, BatchResponse)
//! - `engine`: the TargetingEngine itself
//! - `request`: an evaluator bound to a single request context

mod engine;
mod request;
mod types;

pub use engine::TargetingEngine;
pub use request::RequestEvaluator;
pub use types::{BatchResponse, GroupDecision, TargetingResponse};
