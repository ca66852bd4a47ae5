//! Collector agent - turn-level facade used by front-ends.

use std::sync::Arc;
use tracing::info;

use super::conversation_store::ConversationStore;
use super::orchestrator::CollectionOrchestrator;
use super::target_catalog::TargetCatalog;
use crate::domain::collection::{Message, MessageRole, ModelConfig};
use crate::ports::{CatalogError, ProviderFactory};

/// Messages after a turn: the full history and the assistant messages the turn added.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub messages: Vec<Message>,
    pub new_messages: Vec<Message>,
}

impl TurnOutcome {
    fn since(messages: Vec<Message>, start: usize) -> Self {
        let new_messages = messages
            .iter()
            .skip(start)
            .filter(|m| m.role == MessageRole::Assistant)
            .cloned()
            .collect();
        Self {
            messages,
            new_messages,
        }
    }
}

/// Collection progress of one target, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStatus {
    pub id: String,
    pub name: String,
    pub required: bool,
    pub collected: bool,
}

pub struct CollectorAgent {
    catalog: Arc<TargetCatalog>,
    store: Arc<ConversationStore>,
    orchestrator: CollectionOrchestrator,
}

impl CollectorAgent {
    pub fn new(
        catalog: Arc<TargetCatalog>,
        store: Arc<ConversationStore>,
        providers: Arc<dyn ProviderFactory>,
    ) -> Self {
        let orchestrator =
            CollectionOrchestrator::new(Arc::clone(&catalog), Arc::clone(&store), providers);
        Self {
            catalog,
            store,
            orchestrator,
        }
    }

    /// Stores the model settings and runs a turn on the existing history.
    ///
    /// On a fresh conversation this produces the first question.
    pub async fn initialize_chat(&self, model: ModelConfig) -> TurnOutcome {
        info!(model = %model.name, provider = model.provider.as_str(), "Initializing chat");
        self.store.set_model_settings(model).await;

        let start = self.store.messages().await.len();
        let state = self.orchestrator.run().await;
        TurnOutcome::since(state.messages, start)
    }

    /// Appends a user message and runs a turn. Blank input is ignored.
    pub async fn add_user_message(&self, content: &str) -> TurnOutcome {
        let content = content.trim();
        if content.is_empty() {
            let messages = self.store.messages().await;
            let start = messages.len();
            return TurnOutcome::since(messages, start);
        }

        self.store.append_message(Message::user(content)).await;
        let start = self.store.messages().await.len();
        let state = self.orchestrator.run().await;
        TurnOutcome::since(state.messages, start)
    }

    /// Wipes the stored conversation.
    pub async fn reset(&self) -> bool {
        self.store.reset().await
    }

    /// Collected-field overview, in catalog order.
    pub async fn status(&self) -> Result<Vec<FieldStatus>, CatalogError> {
        let targets = self.catalog.load().await?;
        let results = self.store.results().await;

        Ok(targets
            .values()
            .map(|target| FieldStatus {
                id: target.id.clone(),
                name: target.name.clone(),
                required: target.required,
                collected: results.contains_key(&target.id),
            })
            .collect())
    }

    /// History without debug messages.
    pub async fn visible_messages(&self) -> Vec<Message> {
        self.store
            .load()
            .await
            .visible_messages()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn model_settings(&self) -> ModelConfig {
        self.store.model_settings().await
    }
}
