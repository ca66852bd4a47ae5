//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the collector to external systems:
//! - `ai` - LLM providers (Ollama, OpenAI, mock) and provider selection
//! - `catalog` - Target definition sources (JSON file, static)
//! - `storage` - Conversation state persistence (JSON file, in-memory)

pub mod ai;
pub mod catalog;
pub mod storage;
