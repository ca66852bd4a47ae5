//! Conversation store - cached access to the single conversation state.
//!
//! The store owns an in-memory copy of the state plus the content hash of
//! the last document it wrote. Saving a state whose canonical hash matches
//! the last write is a no-op, so repeated saves of unchanged state never
//! touch storage. Callers always receive and hand over deep copies.

use indexmap::IndexMap;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::collection::{
    CollectedResult, ConversationState, Message, ModelConfig, NodeResult, TargetField,
};
use crate::ports::{StateStorage, StateStorageError};

#[derive(Debug, Default)]
struct Cache {
    state: Option<ConversationState>,
    hash: Option<String>,
}

impl Cache {
    /// Caches the default state together with its hash, so saving it unchanged is a no-op.
    fn reset_to_default(&mut self) -> ConversationState {
        let state = ConversationState::default();
        self.hash = content_hash(&state).ok();
        self.state = Some(state.clone());
        state
    }
}

/// Handle to the conversation state, constructed once per process.
pub struct ConversationStore {
    storage: Arc<dyn StateStorage>,
    cache: Mutex<Cache>,
}

impl ConversationStore {
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self {
            storage,
            cache: Mutex::new(Cache::default()),
        }
    }

    /// Returns a copy of the current state, reading storage on a cold cache.
    ///
    /// A missing document yields the default state. A corrupt document is
    /// logged and replaced by the default state; a read failure is logged
    /// and the default state is returned without caching it. In the first
    /// two cases the default state's hash is recorded as the last write.
    pub async fn load(&self) -> ConversationState {
        let mut cache = self.cache.lock().await;

        if let Some(state) = &cache.state {
            debug!("State cache hit");
            return state.clone();
        }

        match self.storage.load_state().await {
            Ok(Some(state)) => {
                info!(messages = state.messages.len(), results = state.results.len(), "Loaded conversation state");
                cache.hash = content_hash(&state).ok();
                cache.state = Some(state.clone());
                state
            }
            Ok(None) => {
                info!("No conversation state found, starting fresh");
                cache.reset_to_default()
            }
            Err(StateStorageError::DeserializationFailed(reason)) => {
                error!(%reason, "Conversation state is corrupt, using default state");
                cache.reset_to_default()
            }
            Err(e) => {
                error!(error = %e, "Failed to read conversation state");
                ConversationState::default()
            }
        }
    }

    /// Persists `state` unless its content hash matches the last write.
    ///
    /// Returns `false` when the write failed. The cache still takes the new
    /// state so the caller can continue in memory.
    pub async fn save(&self, state: &ConversationState) -> bool {
        let hash = match content_hash(state) {
            Ok(hash) => hash,
            Err(e) => {
                error!(error = %e, "Failed to hash conversation state");
                return false;
            }
        };

        let mut cache = self.cache.lock().await;

        if cache.hash.as_deref() == Some(hash.as_str()) {
            debug!("State unchanged, skipping write");
            cache.state = Some(state.clone());
            return true;
        }

        cache.state = Some(state.clone());
        match self.storage.save_state(state).await {
            Ok(()) => {
                info!(messages = state.messages.len(), node_result = %state.node_result, "Saved conversation state");
                cache.hash = Some(hash);
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to save conversation state");
                false
            }
        }
    }

    /// Forgets the cached state so the next `load` reads storage again.
    pub async fn invalidate_cache(&self) {
        let mut cache = self.cache.lock().await;
        cache.state = None;
        cache.hash = None;
        debug!("State cache invalidated");
    }

    /// Deletes the stored document and resets the cache to the default state.
    ///
    /// Returns `false` if deletion failed.
    pub async fn reset(&self) -> bool {
        let mut cache = self.cache.lock().await;
        cache.reset_to_default();

        match self.storage.delete().await {
            Ok(()) => {
                info!("Conversation state reset");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to delete conversation state");
                false
            }
        }
    }

    /// Loads, applies `mutate`, saves. Returns the saved state and whether the write succeeded.
    pub async fn update<F>(&self, mutate: F) -> (ConversationState, bool)
    where
        F: FnOnce(&mut ConversationState),
    {
        let mut state = self.load().await;
        mutate(&mut state);
        let saved = self.save(&state).await;
        (state, saved)
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.load().await.messages
    }

    pub async fn results(&self) -> IndexMap<String, CollectedResult> {
        self.load().await.results
    }

    pub async fn node_result(&self) -> NodeResult {
        self.load().await.node_result
    }

    pub async fn current_target(&self) -> Option<TargetField> {
        self.load().await.current_target
    }

    /// Active model settings, or defaults when none are stored.
    pub async fn model_settings(&self) -> ModelConfig {
        self.load().await.model_or_default()
    }

    pub async fn set_model_settings(&self, model: ModelConfig) -> bool {
        if !model.has_required_credential() {
            warn!(provider = model.provider.as_str(), "Storing model settings without a credential");
        }
        self.update(|state| state.model_config = Some(model)).await.1
    }

    pub async fn append_message(&self, message: Message) -> bool {
        self.update(|state| state.messages.push(message)).await.1
    }
}

/// SHA-256 over the state serialized with every object's keys sorted.
pub fn content_hash(state: &ConversationState) -> Result<String, serde_json::Error> {
    let value = canonicalize(serde_json::to_value(state)?);
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(&value)?);
    Ok(format!("{:x}", hasher.finalize()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, canonicalize(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
