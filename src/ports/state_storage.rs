//! State Storage Port - Interface for persisting conversation state.
//!
//! This port defines how the single conversation state document is
//! written, read and removed. The document is always replaced whole.

use async_trait::async_trait;

use crate::domain::collection::ConversationState;

/// Errors that can occur during state storage operations
#[derive(Debug, thiserror::Error)]
pub enum StateStorageError {
    #[error("Failed to serialize state: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize state: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting and loading conversation state
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Save conversation state, replacing any previous document
    ///
    /// # Errors
    /// Returns `StateStorageError` if the write fails
    async fn save_state(&self, state: &ConversationState) -> Result<(), StateStorageError>;

    /// Load conversation state
    ///
    /// # Returns
    /// `None` when no document exists yet
    ///
    /// # Errors
    /// Returns `StateStorageError::DeserializationFailed` for a malformed document
    async fn load_state(&self) -> Result<Option<ConversationState>, StateStorageError>;

    /// Check if a state document exists
    async fn exists(&self) -> Result<bool, StateStorageError>;

    /// Delete the state document. Deleting an absent document succeeds.
    ///
    /// # Errors
    /// Returns `StateStorageError` if deletion fails
    async fn delete(&self) -> Result<(), StateStorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_storage_error_serialization() {
        let err = StateStorageError::SerializationFailed("bad float".to_string());
        assert!(err.to_string().contains("serialize"));
    }

    #[test]
    fn test_state_storage_error_io() {
        let err = StateStorageError::IoError("permission denied".to_string());
        assert_eq!(err.to_string(), "IO error: permission denied");
    }
}
