//! AdTarget SDK
//!
//! High-level API for deciding advertisement eligibility: configure a
//! `TargetingEngine` once, then evaluate candidate targeting groups per
//! request.

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;

// Re-export main types
pub use builder::TargetingEngineBuilder;
pub use config::EngineConfig;
pub use engine::{BatchResponse, GroupDecision, RequestEvaluator, TargetingEngine, TargetingResponse};
pub use error::{Result, SdkError};

// Re-export commonly used types from dependencies
pub use adtarget_core::{
    ConstantPredicate, FnPredicate, Inverted, PredicateError, PredicateResult, RequestContext,
    TargetingGroup, TargetingPredicate, Value,
};
pub use adtarget_runtime::{
    CancellationPolicy, EvaluationError, EvaluationOutcome, EvaluatorConfig, Metrics,
    MetricsCollector, Rejection,
};
