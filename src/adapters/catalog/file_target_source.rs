//! File-based Target Source Adapter
//!
//! Reads a JSON object mapping field ids to
//! `{name, description, required?, example}` definitions.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::collection::{ExampleShape, TargetField, TargetMap};
use crate::ports::{CatalogError, TargetSource};

/// Target source backed by a JSON file
#[derive(Debug, Clone)]
pub struct FileTargetSource {
    path: PathBuf,
}

impl FileTargetSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TargetSource for FileTargetSource {
    async fn load_targets(&self) -> Result<TargetMap, CatalogError> {
        if !self.path.exists() {
            return Err(CatalogError::not_found(&self.path));
        }

        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|e| CatalogError::Unreadable {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        parse_targets(&raw)
    }
}

/// Parses a catalog document, keeping definition order.
///
/// # Errors
/// `Malformed` for invalid JSON or wrong value types, `MissingKey` when a
/// definition lacks `name`, `description` or `example`.
pub fn parse_targets(raw: &str) -> Result<TargetMap, CatalogError> {
    let document: Value =
        serde_json::from_str(raw).map_err(|e| CatalogError::Malformed(e.to_string()))?;

    let Value::Object(entries) = document else {
        return Err(CatalogError::Malformed(
            "top level must be a JSON object keyed by field id".to_string(),
        ));
    };

    let mut targets = TargetMap::with_capacity(entries.len());
    for (id, definition) in entries {
        let Value::Object(definition) = definition else {
            return Err(CatalogError::Malformed(format!(
                "definition of '{}' must be a JSON object",
                id
            )));
        };
        let target = parse_definition(&id, &definition)?;
        targets.insert(id, target);
    }

    Ok(targets)
}

fn parse_definition(id: &str, definition: &Map<String, Value>) -> Result<TargetField, CatalogError> {
    let name = string_key(id, definition, "name")?;
    let description = string_key(id, definition, "description")?;
    let example = definition
        .get("example")
        .cloned()
        .ok_or_else(|| missing(id, "example"))?;

    let required = match definition.get("required") {
        None | Some(Value::Null) => true,
        Some(Value::Bool(required)) => *required,
        Some(other) => {
            return Err(CatalogError::Malformed(format!(
                "'{}'.required must be a boolean, got {}",
                id, other
            )))
        }
    };

    let mut target = TargetField::new(id, name, description, ExampleShape::from_value(example));
    target.required = required;
    Ok(target)
}

fn string_key(id: &str, definition: &Map<String, Value>, key: &'static str) -> Result<String, CatalogError> {
    match definition.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(CatalogError::Malformed(format!(
            "'{}'.{} must be a string, got {}",
            id, key, other
        ))),
        None => Err(missing(id, key)),
    }
}

fn missing(id: &str, key: &'static str) -> CatalogError {
    CatalogError::MissingKey {
        id: id.to_string(),
        key,
    }
}
