//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `OllamaProvider` - Local models served by Ollama
//! - `OpenAIProvider` - Hosted OpenAI chat models
//! - `MockAIProvider` - Configurable mock for testing
//! - `ConfiguredProviderFactory` / `StaticProviderFactory` - Provider selection per ModelConfig

mod factory;
mod mock_provider;
mod ollama_provider;
mod openai_provider;

pub use factory::{validate_model, ConfiguredProviderFactory, StaticProviderFactory};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use ollama_provider::{OllamaConfig, OllamaProvider};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
