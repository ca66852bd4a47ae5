//! Static Target Source Adapter
//!
//! Serves a target map built in code. Counts loads so callers can check
//! that the catalog is only read once.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::collection::{TargetField, TargetMap};
use crate::ports::{CatalogError, TargetSource};

#[derive(Debug, Clone, Default)]
pub struct StaticTargetSource {
    targets: TargetMap,
    loads: Arc<AtomicUsize>,
}

impl StaticTargetSource {
    pub fn new(targets: TargetMap) -> Self {
        Self {
            targets,
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Build from a list of targets, keyed by their ids
    pub fn from_fields(fields: impl IntoIterator<Item = TargetField>) -> Self {
        Self::new(fields.into_iter().map(|t| (t.id.clone(), t)).collect())
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TargetSource for StaticTargetSource {
    async fn load_targets(&self) -> Result<TargetMap, CatalogError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.targets.clone())
    }
}
