//! Target Field Definitions
//!
//! A target is one named piece of information the collector must obtain.
//! Its example value fixes the shape the collected data is converted into.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::state::CollectedResult;

/// Target definitions keyed by id, in the order they were defined.
pub type TargetMap = IndexMap<String, TargetField>;

/// A field the collector has to fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetField {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default = "default_required")]
    pub required: bool,
    pub example: ExampleShape,
}

impl TargetField {
    /// Create a required target
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        example: ExampleShape,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            required: true,
            example,
        }
    }

    /// Mark the target as optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

fn default_required() -> bool {
    true
}

/// Expected shape of collected data, carrying the example value.
///
/// Serialized untagged so the example keeps its literal JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExampleShape {
    Object(Map<String, Value>),
    List(Vec<Value>),
    Scalar(Value),
}

impl ExampleShape {
    /// Build the shape from an arbitrary JSON example
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(map),
            Value::Array(items) => Self::List(items),
            other => Self::Scalar(other),
        }
    }

    /// The example as a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(map) => Value::Object(map.clone()),
            Self::List(items) => Value::Array(items.clone()),
            Self::Scalar(value) => value.clone(),
        }
    }

    /// Pretty JSON rendering used inside prompts
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.to_value()).unwrap_or_else(|_| self.to_value().to_string())
    }

    /// Plain text of a scalar example (strings without quotes)
    pub fn scalar_text(&self) -> String {
        match self {
            Self::Scalar(Value::String(s)) => s.clone(),
            other => other.to_value().to_string(),
        }
    }

    /// Key names of an object example, or of the first object item of a list example
    pub fn field_names(&self) -> Vec<String> {
        match self {
            Self::Object(map) => map.keys().cloned().collect(),
            Self::List(items) => match items.first() {
                Some(Value::Object(first)) => first.keys().cloned().collect(),
                _ => Vec::new(),
            },
            Self::Scalar(_) => Vec::new(),
        }
    }
}

/// First required target (in definition order) that has no collected result
pub fn first_missing_required<'a>(
    targets: &'a TargetMap,
    results: &IndexMap<String, CollectedResult>,
) -> Option<&'a TargetField> {
    targets
        .iter()
        .find(|(id, field)| field.required && !results.contains_key(id.as_str()))
        .map(|(_, field)| field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn target(id: &str, required: bool) -> TargetField {
        let field = TargetField::new(id, id.to_uppercase(), "desc", ExampleShape::Scalar(json!("x")));
        if required {
            field
        } else {
            field.optional()
        }
    }

    fn catalog(fields: &[(&str, bool)]) -> TargetMap {
        fields
            .iter()
            .map(|(id, required)| (id.to_string(), target(id, *required)))
            .collect()
    }

    fn collected(id: &str) -> CollectedResult {
        CollectedResult::new(id, id, "desc", json!("value"))
    }

    #[test]
    fn test_first_missing_returns_first_in_definition_order() {
        let targets = catalog(&[("zeta", true), ("alpha", true)]);
        let results = IndexMap::new();

        let missing = first_missing_required(&targets, &results).unwrap();

        assert_eq!(missing.id, "zeta");
    }

    #[test]
    fn test_first_missing_skips_collected_and_optional() {
        let targets = catalog(&[("a", true), ("b", false), ("c", true)]);
        let mut results = IndexMap::new();
        results.insert("a".to_string(), collected("a"));

        let missing = first_missing_required(&targets, &results).unwrap();

        assert_eq!(missing.id, "c");
    }

    #[test]
    fn test_first_missing_none_when_all_required_collected() {
        let targets = catalog(&[("a", true), ("b", false)]);
        let mut results = IndexMap::new();
        results.insert("a".to_string(), collected("a"));

        assert!(first_missing_required(&targets, &results).is_none());
    }

    #[test]
    fn test_example_shape_deserializes_by_json_kind() {
        let object: ExampleShape = serde_json::from_value(json!({"a": 1})).unwrap();
        let list: ExampleShape = serde_json::from_value(json!([{"name": "x"}])).unwrap();
        let scalar: ExampleShape = serde_json::from_value(json!("text")).unwrap();

        assert!(matches!(object, ExampleShape::Object(_)));
        assert!(matches!(list, ExampleShape::List(_)));
        assert!(matches!(scalar, ExampleShape::Scalar(_)));
    }

    #[test]
    fn test_field_names_from_first_list_item() {
        let shape = ExampleShape::from_value(json!([{"name": "a", "role": "b"}, {"other": 1}]));

        assert_eq!(shape.field_names(), vec!["name".to_string(), "role".to_string()]);
    }

    #[test]
    fn test_scalar_text_strips_json_quotes() {
        let shape = ExampleShape::Scalar(json!("A short summary"));

        assert_eq!(shape.scalar_text(), "A short summary");
    }

    #[test]
    fn test_target_required_defaults_to_true() {
        let field: TargetField = serde_json::from_value(json!({
            "id": "a",
            "name": "A",
            "description": "d",
            "example": "e"
        }))
        .unwrap();

        assert!(field.required);
    }

    proptest! {
        #[test]
        fn first_missing_is_none_iff_every_required_is_collected(
            flags in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..12)
        ) {
            let targets: TargetMap = flags
                .iter()
                .enumerate()
                .map(|(i, (required, _))| (format!("t{i}"), target(&format!("t{i}"), *required)))
                .collect();
            let results: IndexMap<String, CollectedResult> = flags
                .iter()
                .enumerate()
                .filter(|(_, (_, present))| *present)
                .map(|(i, _)| (format!("t{i}"), collected(&format!("t{i}"))))
                .collect();

            let expected = targets
                .values()
                .find(|t| t.required && !results.contains_key(&t.id))
                .map(|t| t.id.clone());
            let actual = first_missing_required(&targets, &results).map(|t| t.id.clone());

            let all_collected = targets
                .values()
                .filter(|t| t.required)
                .all(|t| results.contains_key(&t.id));

            prop_assert_eq!(actual.is_none(), all_collected);
            prop_assert_eq!(actual, expected);
        }
    }
}
