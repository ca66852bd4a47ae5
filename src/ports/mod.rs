//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` / `ProviderFactory` - LLM completions for the active model
//! - `StateStorage` - Persistence of the single conversation state document
//! - `TargetSource` - Read-only source of target field definitions

mod ai_provider;
mod state_storage;
mod target_source;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderFactory, ProviderInfo,
};
pub use state_storage::{StateStorage, StateStorageError};
pub use target_source::{CatalogError, TargetSource, CATALOG_EXAMPLE};
