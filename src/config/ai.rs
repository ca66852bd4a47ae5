//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::collection::{ModelConfig, ProviderKind};

/// AI provider configuration
///
/// Supplies the model used until the conversation stores its own settings.
#[derive(Clone, Deserialize)]
pub struct AiConfig {
    /// Provider variant (`ollama` or `openai`)
    #[serde(default)]
    pub provider: ProviderKind,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// API key for the hosted provider
    pub api_key: Option<String>,

    /// Ollama server URL
    #[serde(default = "default_ollama_base_url")]
    pub ollama_base_url: String,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Model settings built from this configuration
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            name: self.model.clone(),
            temperature: self.temperature,
            provider: self.provider,
            credential: self.api_key.clone().filter(|k| !k.trim().is_empty()),
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature(self.temperature));
        }

        if self.provider.requires_credential() && !self.has_api_key() {
            return Err(ValidationError::MissingRequired("FIELD_COLLECTOR__AI__API_KEY"));
        }

        for (field, value) in [
            ("ai.ollama_base_url", &self.ollama_base_url),
            ("ai.openai_base_url", &self.openai_base_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ValidationError::InvalidUrl {
                    field,
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            temperature: default_temperature(),
            api_key: None,
            ollama_base_url: default_ollama_base_url(),
            openai_base_url: default_openai_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("ollama_base_url", &self.ollama_base_url)
            .field("openai_base_url", &self.openai_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_model() -> String {
    ModelConfig::DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f64 {
    ModelConfig::DEFAULT_TEMPERATURE
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    120
}
