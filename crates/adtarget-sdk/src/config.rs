//! Configuration types for TargetingEngine

use crate::error::{Result, SdkError};
use adtarget_runtime::EvaluatorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file stem (any extension the `config` crate understands)
pub const DEFAULT_CONFIG_FILE: &str = "config/targeting";

/// Default environment variable prefix, e.g. `ADTARGET_EVALUATOR__TIMEOUT_MS=250`
pub const DEFAULT_ENV_PREFIX: &str = "ADTARGET";

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Evaluator settings (concurrency, timeout, cancellation)
    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    /// Enable metrics collection
    #[serde(default = "default_enable_metrics")]
    pub enable_metrics: bool,
}

fn default_enable_metrics() -> bool {
    true
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            evaluator: EvaluatorConfig::default(),
            enable_metrics: default_enable_metrics(),
        }
    }

    /// Set evaluator configuration
    pub fn with_evaluator(mut self, evaluator: EvaluatorConfig) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Load configuration from `.env`, `config/targeting.*` and
    /// `ADTARGET_`-prefixed environment variables, in increasing precedence.
    pub fn load() -> Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();
        Self::load_from(DEFAULT_CONFIG_FILE, DEFAULT_ENV_PREFIX)
    }

    /// Load configuration from an optional file and an environment prefix.
    ///
    /// Nested keys use `__` in variable names:
    /// `{PREFIX}_EVALUATOR__MAX_CONCURRENCY=8`.
    pub fn load_from(file_stem: &str, env_prefix: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()?;
        tracing::debug!("Loaded engine configuration: {:?}", loaded);
        Ok(loaded)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let loaded: Self = serde_yaml::from_str(content)?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Read and parse a YAML configuration file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.evaluator
            .validate()
            .map_err(|e| SdkError::Config(e.to_string()))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
