//! Target catalog - memoized access to the target definitions.

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

use crate::domain::collection::{first_missing_required, CollectedResult, TargetField, TargetMap};
use crate::ports::{CatalogError, TargetSource};
use indexmap::IndexMap;

/// Loads the catalog once and serves it for the life of the handle.
pub struct TargetCatalog {
    source: Arc<dyn TargetSource>,
    targets: OnceCell<TargetMap>,
}

impl TargetCatalog {
    pub fn new(source: Arc<dyn TargetSource>) -> Self {
        Self {
            source,
            targets: OnceCell::new(),
        }
    }

    /// Returns the target definitions, reading the source on first use only.
    ///
    /// # Errors
    /// Returns the source's `CatalogError`. A failed load is not cached.
    pub async fn load(&self) -> Result<&TargetMap, CatalogError> {
        self.targets
            .get_or_try_init(|| async {
                let targets = self.source.load_targets().await?;
                info!(count = targets.len(), "Loaded target catalog");
                Ok::<_, CatalogError>(targets)
            })
            .await
    }

    /// First required target, in definition order, with no collected result.
    pub async fn first_missing_required(
        &self,
        results: &IndexMap<String, CollectedResult>,
    ) -> Result<Option<TargetField>, CatalogError> {
        let targets = self.load().await?;
        Ok(first_missing_required(targets, results).cloned())
    }
}
