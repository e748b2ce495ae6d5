//! SDK error types

use adtarget_runtime::EvaluationError;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration could not be read from its sources
    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    /// Configuration YAML could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Evaluation failed (predicate failure, timeout or interruption)
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}

impl SdkError {
    /// The evaluation error behind this failure, if any
    pub fn as_evaluation(&self) -> Option<&EvaluationError> {
        match self {
            SdkError::Evaluation(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
