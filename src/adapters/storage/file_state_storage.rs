//! File-based State Storage Adapter
//!
//! Stores the conversation state as one pretty-printed JSON file on disk.
//! Writes go to a sibling temp file first and are renamed into place, so a
//! reader never observes a half-written document.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::collection::ConversationState;
use crate::ports::{StateStorage, StateStorageError};

/// File-based storage for conversation state
#[derive(Debug, Clone)]
pub struct FileStateStorage {
    path: PathBuf,
}

impl FileStateStorage {
    /// Create a new file storage for a state document path
    ///
    /// # Example
    /// ```ignore
    /// let storage = FileStateStorage::new("./resources/data/state.json");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the state document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Ensure the parent directory exists
    async fn ensure_parent(&self) -> Result<(), StateStorageError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .await
                .map_err(|e| StateStorageError::IoError(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl StateStorage for FileStateStorage {
    async fn save_state(&self, state: &ConversationState) -> Result<(), StateStorageError> {
        self.ensure_parent().await?;

        let json = serde_json::to_string_pretty(state)
            .map_err(|e| StateStorageError::SerializationFailed(e.to_string()))?;

        let temp = self.temp_path();
        fs::write(&temp, json)
            .await
            .map_err(|e| StateStorageError::IoError(e.to_string()))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StateStorageError::IoError(e.to_string()))?;

        Ok(())
    }

    async fn load_state(&self) -> Result<Option<ConversationState>, StateStorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .await
            .map_err(|e| StateStorageError::IoError(e.to_string()))?;

        let state = serde_json::from_str(&json)
            .map_err(|e| StateStorageError::DeserializationFailed(e.to_string()))?;

        Ok(Some(state))
    }

    async fn exists(&self) -> Result<bool, StateStorageError> {
        Ok(self.path.exists())
    }

    async fn delete(&self) -> Result<(), StateStorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .await
                .map_err(|e| StateStorageError::IoError(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::{CollectedResult, Message, ModelConfig, NodeResult};
    use serde_json::json;
    use tempfile::TempDir;

    fn test_state() -> ConversationState {
        let mut state = ConversationState::new();
        state.messages.push(Message::assistant("What is the goal?"));
        state.messages.push(Message::user("Ship faster"));
        state.node_result = NodeResult::QuestionGenerated;
        state
            .results
            .insert("goal".to_string(), CollectedResult::new("goal", "Goal", "d", json!("Ship faster")));
        state.model_config = Some(ModelConfig::local("mistral", 0.2));
        state
    }

    #[tokio::test]
    async fn test_file_storage_save_and_load_state() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStateStorage::new(temp_dir.path().join("state.json"));

        let state = test_state();
        storage.save_state(&state).await.unwrap();

        let loaded = storage.load_state().await.unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_file_storage_load_missing_state_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStateStorage::new(temp_dir.path().join("state.json"));

        assert!(storage.load_state().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_storage_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data").join("state.json");
        let storage = FileStateStorage::new(&path);

        storage.save_state(&ConversationState::new()).await.unwrap();

        assert!(path.exists());
        assert!(!storage.temp_path().exists());
    }

    #[tokio::test]
    async fn test_file_storage_writes_pretty_json() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStateStorage::new(temp_dir.path().join("state.json"));

        storage.save_state(&test_state()).await.unwrap();

        let raw = std::fs::read_to_string(storage.path()).unwrap();
        assert!(raw.contains("\n  \"messages\""));
        assert!(raw.contains("\"node_result\": \"question_generated\""));
    }

    #[tokio::test]
    async fn test_file_storage_corrupt_document_fails_to_deserialize() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStateStorage::new(temp_dir.path().join("state.json"));
        std::fs::write(storage.path(), "{ not json").unwrap();

        let result = storage.load_state().await;

        assert!(matches!(result, Err(StateStorageError::DeserializationFailed(_))));
    }

    #[tokio::test]
    async fn test_file_storage_exists_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStateStorage::new(temp_dir.path().join("state.json"));

        assert!(!storage.exists().await.unwrap());
        storage.save_state(&test_state()).await.unwrap();
        assert!(storage.exists().await.unwrap());

        storage.delete().await.unwrap();
        assert!(!storage.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_file_storage_delete_missing_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStateStorage::new(temp_dir.path().join("state.json"));

        assert!(storage.delete().await.is_ok());
    }
}
