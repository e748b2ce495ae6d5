//! AdTarget Core - Core types and definitions for ad targeting
//!
//! This crate provides the fundamental types shared by the evaluator and SDK:
//! - Value types for request attributes
//! - The request context predicates are evaluated against
//! - The `TargetingPredicate` capability and its result type
//! - Targeting groups (ordered predicate sequences for one advertisement)
//! - Error types

pub mod context;
pub mod error;
pub mod group;
pub mod predicate;
pub mod types;

// Re-export commonly used types
pub use context::RequestContext;
pub use error::{PredicateError, Result};
pub use group::TargetingGroup;
pub use predicate::{
    ConstantPredicate, FnPredicate, Inverted, PredicateResult, TargetingPredicate,
};
pub use types::Value;
