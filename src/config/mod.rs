//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `FIELD_COLLECTOR` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment yields a working local setup.
//!
//! # Example
//!
//! ```no_run
//! use field_collector::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Catalog at {}", config.storage.target_path().display());
//! ```

mod ai;
mod error;
mod storage;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Catalog and state document locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Default model and provider endpoints
    #[serde(default)]
    pub ai: AiConfig,

    /// Log filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `FIELD_COLLECTOR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `FIELD_COLLECTOR__STORAGE__DATA_DIR=./data` -> `storage.data_dir = ./data`
    /// - `FIELD_COLLECTOR__AI__PROVIDER=openai` -> `ai.provider = openai`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FIELD_COLLECTOR")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.storage.validate()?;
        self.ai.validate()?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            ai: AiConfig::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::ProviderKind;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("FIELD_COLLECTOR__STORAGE__DATA_DIR");
        env::remove_var("FIELD_COLLECTOR__STORAGE__STATE_FILE");
        env::remove_var("FIELD_COLLECTOR__AI__PROVIDER");
        env::remove_var("FIELD_COLLECTOR__AI__MODEL");
        env::remove_var("FIELD_COLLECTOR__AI__TEMPERATURE");
        env::remove_var("FIELD_COLLECTOR__AI__API_KEY");
        env::remove_var("FIELD_COLLECTOR__AI__TIMEOUT_SECS");
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("resources/data"));
        assert_eq!(config.ai.provider, ProviderKind::Ollama);
        assert_eq!(config.ai.model, "llama3");
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("FIELD_COLLECTOR__STORAGE__DATA_DIR", "/tmp/collector");
        env::set_var("FIELD_COLLECTOR__STORAGE__STATE_FILE", "session.json");
        env::set_var("FIELD_COLLECTOR__AI__PROVIDER", "openai");
        env::set_var("FIELD_COLLECTOR__AI__MODEL", "gpt-4o");
        env::set_var("FIELD_COLLECTOR__AI__API_KEY", "sk-test");
        env::set_var("FIELD_COLLECTOR__AI__TIMEOUT_SECS", "30");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.storage.state_path(), PathBuf::from("/tmp/collector/session.json"));
        assert_eq!(config.ai.provider, ProviderKind::OpenAI);
        assert_eq!(config.ai.model, "gpt-4o");
        assert_eq!(config.ai.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_openai_without_key() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("FIELD_COLLECTOR__AI__PROVIDER", "openai");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }
}
