//! Parameter scopes and placeholders.
//!
//! A route declares path-level parameters once for all its methods, and
//! each operation declares its own. The two lists are concatenated,
//! path-level first, without de-duplicating by name.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::types::config::ParamStyle;
use crate::types::example::ParamPlaceholder;

/// Where a parameter is carried, from its `in` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Body,
    Query,
    Path,
    /// `header`, `formData`, or anything unrecognised
    Other,
}

impl ParamLocation {
    pub fn of(parameter: &Value) -> Self {
        match parameter.get("in").and_then(Value::as_str) {
            Some("body") => Self::Body,
            Some("query") => Self::Query,
            Some("path") => Self::Path,
            _ => Self::Other,
        }
    }
}

/// The `parameters` array of a path item or operation. Empty when absent
/// or malformed.
pub fn parameter_list(scope: &Map<String, Value>) -> &[Value] {
    scope
        .get("parameters")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Path-level parameters followed by operation-level parameters.
///
/// A name declared in both scopes appears twice.
pub fn merge<'a>(path_level: &'a [Value], operation_level: &'a [Value]) -> Vec<&'a Value> {
    path_level.iter().chain(operation_level.iter()).collect()
}

/// First body parameter among the operation's own parameters.
pub fn body_parameter(operation_level: &[Value]) -> Option<&Value> {
    operation_level
        .iter()
        .find(|p| ParamLocation::of(p) == ParamLocation::Body)
}

/// Placeholders for every merged parameter at `location`, keyed by name.
///
/// A repeated name keeps its first position and takes the later value, so
/// an operation-level declaration overrides a path-level one in the map.
pub fn placeholders(
    merged: &[&Value],
    location: ParamLocation,
    style: ParamStyle,
) -> IndexMap<String, ParamPlaceholder> {
    let mut out = IndexMap::new();
    for parameter in merged {
        if ParamLocation::of(parameter) != location {
            continue;
        }
        let Some(name) = parameter.get("name").and_then(Value::as_str) else {
            continue;
        };
        out.insert(name.to_string(), placeholder(parameter, location, style));
    }
    out
}

/// Placeholder for one query or path parameter.
pub fn placeholder(parameter: &Value, location: ParamLocation, style: ParamStyle) -> ParamPlaceholder {
    match style {
        ParamStyle::Placeholder => {
            if parameter.get("required").and_then(Value::as_bool) == Some(true) {
                ParamPlaceholder::Required
            } else {
                ParamPlaceholder::Unset
            }
        }
        ParamStyle::Inferred => ParamPlaceholder::Sample(sample_value(parameter, location)),
    }
}

fn sample_value(parameter: &Value, location: ParamLocation) -> Value {
    if let Some(default) = parameter.get("default") {
        return default.clone();
    }
    match (parameter.get("type").and_then(Value::as_str), location) {
        (Some("number"), _) => json!(0),
        (Some("boolean"), ParamLocation::Query) => Value::Bool(false),
        _ => Value::String(String::new()),
    }
}
