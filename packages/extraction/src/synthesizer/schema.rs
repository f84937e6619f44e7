//! Schema → example value expansion.

use serde_json::{json, Map, Value};
use tracing::debug;

/// Prefix every internal reference carries.
pub const REF_PREFIX: &str = "#/definitions/";

/// Definition name of a `#/definitions/<name>` reference.
pub fn definition_name(reference: &str) -> Option<&str> {
    reference.strip_prefix(REF_PREFIX).filter(|name| !name.is_empty())
}

/// Sample value for a field descriptor without a nested `$ref`.
///
/// An explicit `default` is returned verbatim. Otherwise the value follows
/// `type`: `number` → `0`, `boolean` → `false`, `array` → `[]`,
/// `object` → `{}`, anything else (including no type) → `""`.
pub fn default_value(descriptor: &Value) -> Value {
    if let Some(default) = descriptor.get("default") {
        return default.clone();
    }
    match descriptor.get("type").and_then(Value::as_str) {
        Some("number") => json!(0),
        Some("boolean") => Value::Bool(false),
        Some("array") => Value::Array(Vec::new()),
        Some("object") => Value::Object(Map::new()),
        _ => Value::String(String::new()),
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Expands schemas into example values against one set of definitions.
///
/// References currently being expanded are kept on a stack. Meeting one of
/// them again yields `{}`, so `A → B → A` stops after one round trip. The
/// stack is also capped at `max_depth`.
pub struct ExampleBuilder<'d> {
    definitions: &'d Map<String, Value>,
    max_depth: usize,
    expanding: Vec<String>,
}

impl<'d> ExampleBuilder<'d> {
    pub fn new(definitions: &'d Map<String, Value>, max_depth: usize) -> Self {
        Self {
            definitions,
            max_depth,
            expanding: Vec::new(),
        }
    }

    /// Build the example for `schema`.
    ///
    /// Absent, `null` or non-object schemas give `{}`, as do unresolvable
    /// references and schemas without `properties`.
    pub fn build(&mut self, schema: Option<&Value>) -> Value {
        let schema = match schema {
            Some(Value::Object(schema)) => schema,
            _ => return empty_object(),
        };

        let Some(reference) = schema.get("$ref") else {
            return self.expand_properties(schema);
        };

        let Some(name) = reference.as_str().and_then(definition_name) else {
            debug!(reference = %reference, "Unsupported reference, using empty object");
            return empty_object();
        };

        if self.expanding.iter().any(|n| n == name) {
            debug!(reference = name, "Reference cycle, using empty object");
            return empty_object();
        }
        if self.expanding.len() >= self.max_depth {
            debug!(reference = name, depth = self.max_depth, "Reference depth exceeded");
            return empty_object();
        }

        let definitions = self.definitions;
        let Some(Value::Object(target)) = definitions.get(name) else {
            debug!(reference = name, "Unresolvable reference, using empty object");
            return empty_object();
        };

        self.expanding.push(name.to_string());
        let value = self.expand_properties(target);
        self.expanding.pop();
        value
    }

    fn expand_properties(&mut self, schema: &Map<String, Value>) -> Value {
        let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
            return empty_object();
        };

        let mut example = Map::new();
        for (field, descriptor) in properties {
            let value = if descriptor.get("$ref").is_some() {
                self.build(Some(descriptor))
            } else {
                default_value(descriptor)
            };
            example.insert(field.clone(), value);
        }
        Value::Object(example)
    }
}
