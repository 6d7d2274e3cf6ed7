//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{ConfigError, KeywordTaxonomy, PitchConfig, ScoringConfig};

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Agent identity stamped on export records
    #[serde(default)]
    pub agent: AgentSettings,

    /// Suitability score weights
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Pitch composition limits
    #[serde(default)]
    pub pitch: PitchConfig,

    /// Optional YAML file replacing the built-in keyword taxonomy
    #[serde(default)]
    pub taxonomy_path: Option<PathBuf>,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "default_agent_version")]
    pub agent_version: String,

    #[serde(default = "default_analysis_method")]
    pub analysis_method: String,
}

fn default_agent_version() -> String {
    "1.0".to_string()
}

fn default_analysis_method() -> String {
    "Rule-based needs/plan/pitch pipeline".to_string()
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            agent_version: default_agent_version(),
            analysis_method: default_analysis_method(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        self.pitch.validate()?;
        self.validate_agent()?;
        self.validate_observability()?;
        Ok(())
    }

    fn validate_agent(&self) -> Result<(), ConfigError> {
        if self.agent.agent_version.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "agent.agent_version".to_string(),
                message: "Must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn validate_observability(&self) -> Result<(), ConfigError> {
        let level = self.observability.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "observability.log_level".to_string(),
                message: format!(
                    "Must be one of {}, got '{}'",
                    LOG_LEVELS.join(", "),
                    self.observability.log_level
                ),
            });
        }
        Ok(())
    }

    /// Keyword taxonomy from `taxonomy_path`, or the built-in tables
    pub fn taxonomy(&self) -> Result<KeywordTaxonomy, ConfigError> {
        match &self.taxonomy_path {
            Some(path) => KeywordTaxonomy::load(path),
            None => Ok(KeywordTaxonomy::default()),
        }
    }
}

/// Load settings from files and environment
///
/// Sources, later wins: `config/default`, `config/{env}`, then
/// `TELECOM_PITCH__SECTION__KEY` environment variables.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name("config/default").required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("TELECOM_PITCH")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    // Validate
    settings.validate()?;

    tracing::debug!(
        env = env.unwrap_or("default"),
        agent_version = %settings.agent.agent_version,
        custom_taxonomy = settings.taxonomy_path.is_some(),
        "Settings loaded"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.agent.agent_version, "1.0");
        assert_eq!(settings.scoring.base_score, 5.0);
        assert_eq!(settings.pitch.max_feature_highlights, 5);
        assert_eq!(settings.observability.log_level, "info");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.observability.log_level = "loud".to_string();
        assert!(settings.validate().is_err());

        settings.observability.log_level = "DEBUG".to_string();
        assert!(settings.validate().is_ok());

        settings.agent.agent_version = " ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "scoring:\n  base_score: 6.0\npitch:\n  loyalty_years_threshold: 5\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.scoring.base_score, 6.0);
        assert_eq!(settings.scoring.max_score, 10.0);
        assert_eq!(settings.pitch.loyalty_years_threshold, 5);
        assert_eq!(settings.pitch.objection_features, 3);
        assert_eq!(settings.agent.analysis_method, "Rule-based needs/plan/pitch pipeline");
    }

    #[test]
    fn test_taxonomy_from_path() {
        let mut settings = Settings::default();
        assert!(settings.taxonomy().is_ok());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"tiers: {}\nbinary: {}\nsegments: []\npain_points: []\n")
            .unwrap();
        settings.taxonomy_path = Some(file.path().to_path_buf());
        let taxonomy = settings.taxonomy().unwrap();
        assert!(taxonomy.segments.is_empty());

        settings.taxonomy_path = Some(PathBuf::from("/nonexistent/taxonomy.yaml"));
        assert!(settings.taxonomy().is_err());
    }
}
