//! Configuration management for the Farm Sensor Monitoring Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FSM_ prefix
//!
//! Paths are never read from hidden globals: every component receives its
//! configuration at construction, and the defaults below are fallbacks only.

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Data source configuration
    pub data: DataConfig,

    /// Model training and persistence configuration
    pub model: ModelConfig,

    /// Forecast configuration
    pub forecast: ForecastConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Path of the exported sensor data document
    pub source_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Path of the persisted model artifact
    pub artifact_path: String,

    /// Number of trees in the ensemble
    pub n_trees: usize,

    /// Seed for the train/test split and bootstrap sampling
    pub seed: u64,

    /// Fraction of rows held out for evaluation
    pub test_fraction: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Number of hourly steps to project forward
    pub horizon_hours: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("FSM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("data.source_path", "data/dados_app.json")?
            .set_default("model.artifact_path", "models/sensor_model.bin")?
            .set_default("model.n_trees", 100)?
            .set_default("model.seed", 42)?
            .set_default("model.test_fraction", 0.2)?
            .set_default("forecast.horizon_hours", 24)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FSM_ prefix)
            .add_source(
                Environment::with_prefix("FSM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source_path: "data/dados_app.json".to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: "models/sensor_model.bin".to_string(),
            n_trees: 100,
            seed: 42,
            test_fraction: 0.2,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { horizon_hours: 24 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            data: DataConfig::default(),
            model: ModelConfig::default(),
            forecast: ForecastConfig::default(),
        }
    }
}
