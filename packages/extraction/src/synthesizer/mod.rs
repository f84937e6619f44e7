//! Example synthesis.
//!
//! Walks every route and method of an [`ApiDescription`] and produces one
//! [`ExampleEntry`] per operation. Synthesis is best effort: malformed
//! path items, parameters and schemas degrade to defaults. The only hard
//! failure is a document without a `paths` mapping.

pub mod params;
pub mod schema;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{SynthesisError, SynthesisResult};
use crate::types::config::SynthesisOptions;
use crate::types::document::{ApiDescription, OPERATION_METHODS};
use crate::types::example::{ExampleBody, ExampleEntry, BODY_KEY};

use params::ParamLocation;
pub use schema::{default_value, definition_name, ExampleBuilder, REF_PREFIX};

/// Synthesize examples with default options.
pub fn synthesize(doc: &ApiDescription) -> SynthesisResult<Vec<ExampleEntry>> {
    Synthesizer::default().synthesize(doc)
}

/// Example value for one schema, resolving against `definitions`.
pub fn build_example(schema: Option<&Value>, definitions: &Map<String, Value>) -> Value {
    ExampleBuilder::new(definitions, SynthesisOptions::default().max_depth).build(schema)
}

#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    options: SynthesisOptions,
}

impl Synthesizer {
    pub fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    /// One entry per (route, method), in document order.
    pub fn synthesize(&self, doc: &ApiDescription) -> SynthesisResult<Vec<ExampleEntry>> {
        let paths = doc.paths().ok_or(SynthesisError::NoOperations)?;
        let base_path = doc.base_path();
        let definitions = doc.definitions();

        let mut entries = Vec::new();
        for (route, item) in paths {
            let Some(item) = item.as_object() else {
                debug!(route = %route, "Skipping path item that is not an object");
                continue;
            };
            let shared = params::parameter_list(item);

            for (method, operation) in item {
                if !is_operation_method(method) {
                    continue;
                }
                let Some(operation) = operation.as_object() else {
                    debug!(route = %route, method = %method, "Skipping malformed operation");
                    continue;
                };
                entries.push(self.build_entry(
                    base_path,
                    route,
                    method,
                    shared,
                    operation,
                    definitions,
                ));
            }
        }

        debug!(
            base_path = %base_path,
            routes = paths.len(),
            entries = entries.len(),
            "Synthesized examples"
        );
        Ok(entries)
    }

    fn build_entry(
        &self,
        base_path: &str,
        route: &str,
        method: &str,
        shared: &[Value],
        operation: &Map<String, Value>,
        definitions: &Map<String, Value>,
    ) -> ExampleEntry {
        let own = params::parameter_list(operation);
        let merged = params::merge(shared, own);
        let style = self.options.param_style;

        let mut entry = ExampleEntry::new(method, format!("{base_path}{route}"))
            .with_body(self.build_body(own, definitions));
        entry.query = params::placeholders(&merged, ParamLocation::Query, style);
        entry.params = params::placeholders(&merged, ParamLocation::Path, style);
        entry
    }

    /// Body from the first operation-level body parameter.
    ///
    /// Emitted under the parameter's name only when its schema expands to at
    /// least one property; otherwise the entry carries `body: null`.
    fn build_body(&self, own: &[Value], definitions: &Map<String, Value>) -> ExampleBody {
        let Some(parameter) = params::body_parameter(own) else {
            return ExampleBody::Absent;
        };

        let value = ExampleBuilder::new(definitions, self.options.max_depth)
            .build(parameter.get("schema"));
        match &value {
            Value::Object(fields) if !fields.is_empty() => {
                let name = parameter
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or(BODY_KEY)
                    .to_string();
                ExampleBody::Named { name, value }
            }
            _ => ExampleBody::Absent,
        }
    }
}

fn is_operation_method(key: &str) -> bool {
    OPERATION_METHODS
        .iter()
        .any(|method| method.eq_ignore_ascii_case(key))
}
