//! In-Memory State Storage Adapter
//!
//! Keeps the conversation state document in memory and counts writes.
//! Useful for testing the write gate of the conversation store.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::collection::ConversationState;
use crate::ports::{StateStorage, StateStorageError};

/// In-memory storage for conversation state
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStorage {
    state: Arc<RwLock<Option<ConversationState>>>,
    writes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryStateStorage {
    /// Create a new, empty in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage that already holds `state`
    pub fn with_state(state: ConversationState) -> Self {
        Self {
            state: Arc::new(RwLock::new(Some(state))),
            ..Self::default()
        }
    }

    /// Number of successful `save_state` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent writes fail with an IO error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current stored document, if any
    pub async fn snapshot(&self) -> Option<ConversationState> {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl StateStorage for InMemoryStateStorage {
    async fn save_state(&self, state: &ConversationState) -> Result<(), StateStorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StateStorageError::IoError("write disabled".to_string()));
        }

        *self.state.write().await = Some(state.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load_state(&self) -> Result<Option<ConversationState>, StateStorageError> {
        Ok(self.state.read().await.clone())
    }

    async fn exists(&self) -> Result<bool, StateStorageError> {
        Ok(self.state.read().await.is_some())
    }

    async fn delete(&self) -> Result<(), StateStorageError> {
        *self.state.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::Message;

    #[tokio::test]
    async fn test_memory_storage_save_and_load_state() {
        let storage = InMemoryStateStorage::new();
        let mut state = ConversationState::new();
        state.messages.push(Message::user("hello"));

        storage.save_state(&state).await.unwrap();

        assert_eq!(storage.load_state().await.unwrap(), Some(state));
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_storage_starts_empty() {
        let storage = InMemoryStateStorage::new();

        assert!(storage.load_state().await.unwrap().is_none());
        assert!(!storage.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_storage_failed_write_is_not_counted() {
        let storage = InMemoryStateStorage::new();
        storage.set_fail_writes(true);

        let result = storage.save_state(&ConversationState::new()).await;

        assert!(matches!(result, Err(StateStorageError::IoError(_))));
        assert_eq!(storage.write_count(), 0);
        assert!(storage.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn test_memory_storage_delete() {
        let storage = InMemoryStateStorage::with_state(ConversationState::new());
        assert!(storage.exists().await.unwrap());

        storage.delete().await.unwrap();

        assert!(!storage.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_storage_clones_share_document() {
        let storage = InMemoryStateStorage::new();
        let handle = storage.clone();

        storage.save_state(&ConversationState::new()).await.unwrap();

        assert!(handle.exists().await.unwrap());
        assert_eq!(handle.write_count(), 1);
    }
}
