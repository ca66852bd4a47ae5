//! Provider factories - build the AIProvider serving a ModelConfig.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::ollama_provider::{OllamaConfig, OllamaProvider};
use super::openai_provider::{OpenAIConfig, OpenAIProvider};
use crate::config::AiConfig;
use crate::domain::collection::{ModelConfig, ProviderKind};
use crate::ports::{AIError, AIProvider, ProviderFactory};

/// Rejects a hosted model that has no credential.
pub fn validate_model(model: &ModelConfig) -> Result<(), AIError> {
    if model.has_required_credential() {
        Ok(())
    } else {
        Err(AIError::missing_credential(model.provider.as_str()))
    }
}

/// Builds real HTTP providers from the configured endpoints.
#[derive(Debug, Clone)]
pub struct ConfiguredProviderFactory {
    ollama_base_url: String,
    openai_base_url: String,
    timeout: Duration,
}

impl ConfiguredProviderFactory {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            ollama_base_url: config.ollama_base_url.clone(),
            openai_base_url: config.openai_base_url.clone(),
            timeout: config.timeout(),
        }
    }
}

impl ProviderFactory for ConfiguredProviderFactory {
    fn provider_for(&self, model: &ModelConfig) -> Result<Arc<dyn AIProvider>, AIError> {
        validate_model(model)?;

        match model.provider {
            ProviderKind::Ollama => {
                let config = OllamaConfig::new(&model.name)
                    .with_base_url(&self.ollama_base_url)
                    .with_timeout(self.timeout);
                Ok(Arc::new(OllamaProvider::new(config)?))
            }
            ProviderKind::OpenAI => {
                let credential = model
                    .credential()
                    .ok_or_else(|| AIError::missing_credential(model.provider.as_str()))?;
                let config = OpenAIConfig::new(credential)
                    .with_model(&model.name)
                    .with_base_url(&self.openai_base_url)
                    .with_timeout(self.timeout);
                Ok(Arc::new(OpenAIProvider::new(config)?))
            }
        }
    }
}

/// Hands out one fixed provider, after the same credential check.
///
/// Records every model it was asked for, for tests.
pub struct StaticProviderFactory {
    provider: Arc<dyn AIProvider>,
    requested: Mutex<Vec<ModelConfig>>,
}

impl StaticProviderFactory {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested_models(&self) -> Vec<ModelConfig> {
        self.requested
            .lock()
            .map(|models| models.clone())
            .unwrap_or_default()
    }
}

impl ProviderFactory for StaticProviderFactory {
    fn provider_for(&self, model: &ModelConfig) -> Result<Arc<dyn AIProvider>, AIError> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(model.clone());
        }
        validate_model(model)?;
        Ok(Arc::clone(&self.provider))
    }
}
