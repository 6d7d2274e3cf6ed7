//! Configuration management for the telecom pitch pipeline
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (TELECOM_PITCH_ prefix, `__` separator)
//!
//! The keyword taxonomy that drives needs detection is plain data: the
//! built-in tables live in [`taxonomy`] and can be swapped for a YAML file
//! via `taxonomy_path`.

pub mod scoring;
pub mod settings;
pub mod taxonomy;

pub use scoring::{AllowanceWeights, CostWeight, FlagWeights, PitchConfig, ScoringConfig};
pub use settings::{load_settings, AgentSettings, ObservabilityConfig, Settings};
pub use taxonomy::{BinaryNeeds, KeywordTaxonomy, PainPointRule, SegmentRule, Tier, TieredNeeds};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
