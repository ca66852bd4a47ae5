//! Storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Locations of the catalog and state documents
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding both documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Catalog file name inside `data_dir`
    #[serde(default = "default_target_file")]
    pub target_file: String,

    /// State file name inside `data_dir`
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

impl StorageConfig {
    pub fn target_path(&self) -> PathBuf {
        self.data_dir.join(&self.target_file)
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(&self.state_file)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.target_file.trim().is_empty() {
            return Err(ValidationError::MissingRequired("FIELD_COLLECTOR__STORAGE__TARGET_FILE"));
        }
        if self.state_file.trim().is_empty() {
            return Err(ValidationError::MissingRequired("FIELD_COLLECTOR__STORAGE__STATE_FILE"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            target_file: default_target_file(),
            state_file: default_state_file(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("resources/data")
}

fn default_target_file() -> String {
    "target.json".to_string()
}

fn default_state_file() -> String {
    "state.json".to_string()
}
