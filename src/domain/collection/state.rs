//! Conversation State Entity
//!
//! The single unit of persistence: message history, collected results,
//! the field currently being asked about and the active model settings.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use super::target::TargetField;

/// Complete state of a collection conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConversationState {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub node_result: NodeResult,
    #[serde(default)]
    pub current_target: Option<TargetField>,
    /// Keyed by target id; entries carry only name, description and data
    #[serde(default, deserialize_with = "results_keyed_by_id")]
    pub results: IndexMap<String, CollectedResult>,
    #[serde(default, rename = "model")]
    pub model_config: Option<ModelConfig>,
    /// Text of the last step failure, kept for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversationState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the history
    pub fn add_message(&mut self, role: MessageRole, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    /// Role of the most recent message, if any
    pub fn last_role(&self) -> Option<MessageRole> {
        self.messages.last().map(|m| m.role)
    }

    /// Messages a person should see (debug output excluded)
    pub fn visible_messages(&self) -> Vec<&Message> {
        self.messages.iter().filter(|m| m.role.is_visible()).collect()
    }

    /// Check if a target already has a collected result
    pub fn is_collected(&self, target_id: &str) -> bool {
        self.results.contains_key(target_id)
    }

    /// Store a result; an id that is already present is left untouched
    pub fn record_result(&mut self, result: CollectedResult) -> bool {
        if self.results.contains_key(&result.target_id) {
            return false;
        }
        self.results.insert(result.target_id.clone(), result);
        true
    }

    /// Model settings, falling back to the local default
    pub fn model_or_default(&self) -> ModelConfig {
        self.model_config.clone().unwrap_or_default()
    }
}

/// A message in the conversation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Creates a debug message (raw evaluator output).
    pub fn debug(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Debug, content)
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    #[serde(alias = "human")]
    User,
    #[serde(alias = "ai")]
    Assistant,
    System,
    /// Raw evaluator output, recorded for audit and never rendered
    Debug,
}

impl MessageRole {
    /// Whether messages with this role are shown to the end user
    pub fn is_visible(&self) -> bool {
        !matches!(self, MessageRole::Debug)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
            MessageRole::Debug => "debug",
        }
    }
}

/// Outcome tag of the last executed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeResult {
    /// No step has run yet
    #[default]
    #[serde(rename = "")]
    Pending,
    TargetFound,
    AllTargetsComplete,
    QuestionGenerated,
    AnswerSufficient,
    AnswerInsufficient,
    Error,
}

impl NodeResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeResult::Pending => "",
            NodeResult::TargetFound => "target_found",
            NodeResult::AllTargetsComplete => "all_targets_complete",
            NodeResult::QuestionGenerated => "question_generated",
            NodeResult::AnswerSufficient => "answer_sufficient",
            NodeResult::AnswerInsufficient => "answer_insufficient",
            NodeResult::Error => "error",
        }
    }
}

impl fmt::Display for NodeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data collected for one target. Written once per target id.
///
/// The id is the key of the results map in the stored document, so it is
/// not serialized with the entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectedResult {
    #[serde(skip)]
    pub target_id: String,
    pub name: String,
    pub description: String,
    pub data: Value,
}

impl CollectedResult {
    pub fn new(
        target_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            target_id: target_id.into(),
            name: name.into(),
            description: description.into(),
            data,
        }
    }

    /// Build a result for a target from its converted data
    pub fn for_target(target: &TargetField, data: Value) -> Self {
        Self::new(&target.id, &target.name, &target.description, data)
    }
}

fn results_keyed_by_id<'de, D>(
    deserializer: D,
) -> Result<IndexMap<String, CollectedResult>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut results = IndexMap::<String, CollectedResult>::deserialize(deserializer)?;
    for (id, result) in results.iter_mut() {
        result.target_id = id.clone();
    }
    Ok(results)
}

/// LLM provider variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Locally hosted model, no credential
    #[default]
    Ollama,
    /// Hosted API model, credential required
    OpenAI,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::OpenAI => "openai",
        }
    }

    pub fn requires_credential(&self) -> bool {
        matches!(self, ProviderKind::OpenAI)
    }
}

/// Active model settings, persisted under the `model` key
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    pub name: String,
    pub temperature: f64,
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub credential: Option<String>,
}

impl ModelConfig {
    pub const DEFAULT_MODEL: &'static str = "llama3";
    pub const DEFAULT_TEMPERATURE: f64 = 0.7;

    /// Settings for a locally hosted model
    pub fn local(name: impl Into<String>, temperature: f64) -> Self {
        Self {
            name: name.into(),
            temperature,
            provider: ProviderKind::Ollama,
            credential: None,
        }
    }

    /// Settings for a hosted API model
    pub fn hosted(name: impl Into<String>, temperature: f64, credential: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            temperature,
            provider: ProviderKind::OpenAI,
            credential: Some(credential.into()),
        }
    }

    /// Credential, if present and non-empty
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Whether the settings can be used for an invocation
    pub fn has_required_credential(&self) -> bool {
        !self.provider.requires_credential() || self.credential().is_some()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::local(Self::DEFAULT_MODEL, Self::DEFAULT_TEMPERATURE)
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("name", &self.name)
            .field("temperature", &self.temperature)
            .field("provider", &self.provider)
            .field("credential", &self.credential.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
