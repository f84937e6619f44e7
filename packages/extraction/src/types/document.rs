//! The recovered API description document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Swagger 2.0 method keys recognised under a path item.
pub const OPERATION_METHODS: [&str; 7] = ["get", "put", "post", "delete", "options", "head", "patch"];

/// A Swagger-2.0-shaped description, kept as loosely typed JSON.
///
/// Only `basePath`, `paths` and `definitions` are read. Everything else is
/// carried along untouched. The document is not validated: malformed parts
/// degrade to defaults when examples are synthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiDescription(Map<String, Value>);

impl ApiDescription {
    /// Wrap an already-parsed object.
    pub fn new(document: Map<String, Value>) -> Self {
        Self(document)
    }

    /// Wrap a value, if it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Prefix for every route. Empty when absent or not a string.
    pub fn base_path(&self) -> &str {
        self.0.get("basePath").and_then(Value::as_str).unwrap_or("")
    }

    /// Route template → path item. `None` when missing or not a mapping.
    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.0.get("paths").and_then(Value::as_object)
    }

    /// Reusable schemas by name. Empty when missing.
    pub fn definitions(&self) -> &Map<String, Value> {
        static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
        self.0
            .get("definitions")
            .and_then(Value::as_object)
            .unwrap_or_else(|| EMPTY.get_or_init(Map::new))
    }

    /// Raw access to the whole document.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ApiDescription {
    fn from(document: Map<String, Value>) -> Self {
        Self::new(document)
    }
}
