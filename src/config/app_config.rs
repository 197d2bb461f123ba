use std::time::Duration;

use serde::Deserialize;

use crate::domain::valuation::ValuationTables;
use crate::domain::DomainError;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub model: ModelConfig,
    pub training: TrainingConfig,
    pub valuation: ValuationTables,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Classifier model settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the weights descriptor file
    pub weights_path: String,
    /// Path to the metadata file carrying the ordered label list
    pub metadata_path: String,
    /// Square input resolution agreed between preprocessor and classifier
    pub input_size: u32,
    /// Hidden layer width used when seeding an untrained fallback network
    pub hidden_size: usize,
    /// Seed for deterministic fallback initialization
    pub seed: u64,
    /// Top probability below which a result is reported as Unknown
    pub unknown_threshold: f64,
    /// Deadline for loading the model artifact
    pub load_timeout_ms: u64,
}

/// Retrain policy settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Minimum logged predictions before retraining is allowed
    pub retrain_floor: usize,
    /// Output-bias step per correction occurrence
    pub learning_rate: f32,
    /// Deadline for building and validating a candidate version
    pub retrain_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            weights_path: "model/model.json".to_string(),
            metadata_path: "model/metadata.json".to_string(),
            input_size: 224,
            hidden_size: 32,
            seed: 42,
            unknown_threshold: 0.30,
            load_timeout_ms: 10_000,
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            retrain_floor: 5,
            learning_rate: 0.05,
            retrain_timeout_ms: 30_000,
        }
    }
}

impl ModelConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}

impl TrainingConfig {
    pub fn retrain_timeout(&self) -> Duration {
        Duration::from_millis(self.retrain_timeout_ms)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Validate tunables before the engine serves
    pub fn validate(&self) -> Result<(), DomainError> {
        self.valuation.validate()?;

        if !(0.0..=1.0).contains(&self.model.unknown_threshold) {
            return Err(DomainError::configuration(
                "model.unknown_threshold must be in [0, 1]",
            ));
        }
        if self.model.input_size == 0 {
            return Err(DomainError::configuration(
                "model.input_size must be non-zero",
            ));
        }
        if self.model.hidden_size == 0 {
            return Err(DomainError::configuration(
                "model.hidden_size must be non-zero",
            ));
        }
        if !(self.training.learning_rate.is_finite() && self.training.learning_rate > 0.0) {
            return Err(DomainError::configuration(
                "training.learning_rate must be a positive number",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn test_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.model.input_size, 224);
        assert_eq!(config.model.unknown_threshold, 0.30);
        assert_eq!(config.training.retrain_floor, 5);
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let mut config = AppConfig::default();
        config.model.unknown_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_learning_rate() {
        let mut config = AppConfig::default();
        config.training.learning_rate = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_broken_valuation_tables() {
        let mut config = AppConfig::default();
        config.valuation.rarity.prototype = 0.5;
        assert!(config.validate().is_err());
    }
}
