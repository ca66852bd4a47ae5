//! Target Source Port - Interface for reading target field definitions.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::collection::TargetMap;

/// Shape a catalog document must have, quoted in error messages.
pub const CATALOG_EXAMPLE: &str = r#"{"project_overview": {"name": "Project overview", "description": "Main purpose of the project", "required": true, "example": "Example data"}}"#;

/// Errors raised while loading the catalog. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Target catalog not found: {path}\nCreate it as a JSON object mapping field ids to definitions, e.g.\n{example}")]
    NotFound { path: PathBuf, example: &'static str },

    #[error("Failed to read target catalog {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("Malformed target catalog: {0}")]
    Malformed(String),

    #[error("Target '{id}' is missing required key '{key}'")]
    MissingKey { id: String, key: &'static str },
}

impl CatalogError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            path: path.into(),
            example: CATALOG_EXAMPLE,
        }
    }
}

/// Port for loading the fixed set of target fields
#[async_trait]
pub trait TargetSource: Send + Sync {
    /// Load every target definition, in definition order
    ///
    /// # Errors
    /// Returns `CatalogError` if the catalog is absent or malformed
    async fn load_targets(&self) -> Result<TargetMap, CatalogError>;
}
