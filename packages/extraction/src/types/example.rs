//! Synthesized example requests.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

/// Wire form of an optional parameter that has no value.
pub const UNSET_MARKER: &str = "<unset>";

/// Key the body is emitted under when there is nothing to expand.
pub const BODY_KEY: &str = "body";

const RESERVED_KEYS: [&str; 4] = ["method", "path", "query", "params"];

/// Value standing in for one query or path parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamPlaceholder {
    /// The parameter is marked `required` (wire: `null`)
    Required,
    /// Optional and without a value (wire: [`UNSET_MARKER`])
    Unset,
    /// A sample value inferred from `default`/`type`
    Sample(Value),
}

impl Serialize for ParamPlaceholder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Required => serializer.serialize_unit(),
            Self::Unset => serializer.serialize_str(UNSET_MARKER),
            Self::Sample(value) => value.serialize(serializer),
        }
    }
}

/// Request body of an example.
#[derive(Debug, Clone, PartialEq)]
pub enum ExampleBody {
    /// Expanded body, emitted under the body parameter's own name
    Named { name: String, value: Value },
    /// No body parameter, or one with no properties to expand
    Absent,
}

impl ExampleBody {
    /// Key this body is emitted under.
    ///
    /// Names that would clash with the entry's own keys fall back to `body`.
    pub fn key(&self) -> &str {
        match self {
            Self::Named { name, .. } if !RESERVED_KEYS.contains(&name.as_str()) => name,
            _ => BODY_KEY,
        }
    }

    /// Body value, `None` when absent.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Named { value, .. } => Some(value),
            Self::Absent => None,
        }
    }
}

/// One sample invocation of one (route, method) pair.
///
/// Serializes as a flat object: `method`, `path`, the body key, then
/// `query` and `params` when they have entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleEntry {
    /// Upper-case HTTP method
    pub method: String,
    /// `basePath` + route template
    pub path: String,
    pub body: ExampleBody,
    /// Query parameters by name
    pub query: IndexMap<String, ParamPlaceholder>,
    /// Path parameters by name
    pub params: IndexMap<String, ParamPlaceholder>,
}

impl ExampleEntry {
    pub fn new(method: impl AsRef<str>, path: impl Into<String>) -> Self {
        Self {
            method: method.as_ref().to_uppercase(),
            path: path.into(),
            body: ExampleBody::Absent,
            query: IndexMap::new(),
            params: IndexMap::new(),
        }
    }

    pub fn with_body(mut self, body: ExampleBody) -> Self {
        self.body = body;
        self
    }

    /// Render as a JSON value (the wire form).
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for ExampleEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut len = 3;
        if !self.query.is_empty() {
            len += 1;
        }
        if !self.params.is_empty() {
            len += 1;
        }

        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("method", &self.method)?;
        map.serialize_entry("path", &self.path)?;
        map.serialize_entry(self.body.key(), &self.body.value())?;
        if !self.query.is_empty() {
            map.serialize_entry("query", &self.query)?;
        }
        if !self.params.is_empty() {
            map.serialize_entry("params", &self.params)?;
        }
        map.end()
    }
}
