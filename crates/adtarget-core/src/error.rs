//! Error types for AdTarget Core

use thiserror::Error;

/// Error raised by a targeting predicate while evaluating a request
#[derive(Error, Debug)]
pub enum PredicateError {
    /// A request attribute the predicate depends on is absent
    #[error("Missing request attribute: {0}")]
    MissingAttribute(String),

    /// A request attribute has an unexpected type
    #[error("Type error: {0}")]
    TypeError(String),

    /// The predicate's backing lookup failed
    #[error("Predicate failed: {0}")]
    Failed(String),

    /// Any other failure raised by a predicate implementation
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PredicateError {
    /// Create a generic failure from a message
    pub fn failed(msg: impl Into<String>) -> Self {
        PredicateError::Failed(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PredicateError>;
