//! Application configuration

pub mod app_config;

pub use app_config::{
    AppConfig, LogFormat, LoggingConfig, ModelConfig, ServerConfig, TrainingConfig,
};
