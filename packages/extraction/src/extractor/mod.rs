//! Document extraction.
//!
//! Finds the `var options = {...};` assignment that API-documentation pages
//! render inline, parses the object literal with [`literal`] and returns the
//! description stored under the configured field.

pub mod literal;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ExtractionError, Result};
use crate::types::config::ExtractorConfig;
use crate::types::document::ApiDescription;

pub use literal::{parse_literal, parse_literal_prefix};

/// Extract the description with the default configuration.
pub fn extract(raw: &str) -> Result<ApiDescription> {
    Extractor::default().extract(raw)
}

/// Locates and parses the embedded description in a page.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
    pattern: Regex,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        let pattern = assignment_pattern(&config.variable);
        Self { config, pattern }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Pull the API description out of raw page text.
    pub fn extract(&self, raw: &str) -> Result<ApiDescription> {
        let literal = self
            .pattern
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .ok_or(ExtractionError::PatternNotFound)?;

        debug!(
            variable = %self.config.variable,
            offset = literal.start(),
            length = literal.len(),
            "Found embedded assignment"
        );

        let options = self.parse_options(raw, literal.start(), literal.as_str())?;
        self.description_from(options)
    }

    /// Parse the captured literal.
    ///
    /// The capture ends at the first `};`, which can sit inside a string.
    /// When it does not parse, the parser itself finds the closing brace.
    fn parse_options(&self, raw: &str, start: usize, captured: &str) -> Result<Value> {
        match parse_literal(captured, self.config.max_depth) {
            Ok(value) => Ok(value),
            Err(first) => {
                debug!(error = %first, "Captured literal did not parse, re-scanning");
                match parse_literal_prefix(&raw[start..], self.config.max_depth) {
                    Ok((value, consumed)) => {
                        debug!(length = consumed, "Recovered literal by balanced scan");
                        Ok(value)
                    }
                    Err(e) => {
                        warn!(error = %e, "Embedded object literal is not plain data");
                        Err(ExtractionError::InvalidLiteral(e))
                    }
                }
            }
        }
    }

    fn description_from(&self, options: Value) -> Result<ApiDescription> {
        let missing = || ExtractionError::MissingDescription {
            field: self.config.field.clone(),
        };

        match options {
            Value::Object(mut map) => map
                .remove(&self.config.field)
                .and_then(ApiDescription::from_value)
                .ok_or_else(missing),
            _ => Err(missing()),
        }
    }
}

fn assignment_pattern(variable: &str) -> Regex {
    let source = format!(r"var\s+{}\s*=\s*(\{{[\s\S]*?\}});", regex::escape(variable));
    Regex::new(&source).expect("escaped assignment pattern is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = r#"
        window.onload = function() {
          var url = window.location.search.match(/url=([^&]+)/);
          var options = {
            "swaggerDoc": {
              "swagger": "2.0",
              "basePath": "/api",
              "paths": { "/ping": { "get": {} } }
            },
            "customOptions": {}
          };
          url = options.swaggerUrl || url;
        };
    "#;

    #[test]
    fn test_extracts_swagger_doc() {
        let doc = extract(PAGE).unwrap();
        assert_eq!(doc.base_path(), "/api");
        assert!(doc.paths().unwrap().contains_key("/ping"));
    }

    #[test]
    fn test_pattern_not_found() {
        let err = extract("<html><script>var config = {};</script></html>").unwrap_err();
        assert!(matches!(err, ExtractionError::PatternNotFound));
        assert_eq!(err.to_string(), "pattern not found");
    }

    #[test]
    fn test_missing_description_field() {
        let err = extract("var options = { customOptions: {} };").unwrap_err();
        assert!(matches!(err, ExtractionError::MissingDescription { .. }));
        assert_eq!(err.to_string(), "missing description field");

        let err = extract("var options = { swaggerDoc: null };").unwrap_err();
        assert!(matches!(err, ExtractionError::MissingDescription { .. }));
    }

    #[test]
    fn test_terminator_inside_string_is_recovered() {
        let page = r#"var options = { swaggerDoc: { info: { description: "use {a};" }, paths: {} } };"#;
        let doc = extract(page).unwrap();
        assert_eq!(
            doc.as_map()["info"],
            json!({"description": "use {a};"})
        );
    }

    #[test]
    fn test_executable_content_is_rejected() {
        let page = "var options = { swaggerDoc: require('child_process').execSync('id') };";
        let err = extract(page).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidLiteral(_)));
    }

    #[test]
    fn test_first_assignment_wins() {
        let page = "var options = { swaggerDoc: { basePath: '/one' } };\
                    var options = { swaggerDoc: { basePath: '/two' } };";
        assert_eq!(extract(page).unwrap().base_path(), "/one");
    }

    #[test]
    fn test_custom_variable_and_field() {
        let extractor = Extractor::new(
            ExtractorConfig::new().with_variable("ui.cfg").with_field("spec"),
        );
        let doc = extractor
            .extract("var ui.cfg = { spec: { paths: {} } };")
            .unwrap();
        assert!(doc.paths().is_some());

        // Regex metacharacters in the name are literal
        assert!(matches!(
            extractor.extract("var uixcfg = { spec: {} };"),
            Err(ExtractionError::PatternNotFound)
        ));
    }
}
