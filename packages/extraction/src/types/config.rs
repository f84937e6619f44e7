//! Configuration types for extraction and synthesis.

use serde::{Deserialize, Serialize};

/// Configuration for locating the embedded description in a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Name of the variable the page assigns the options object to.
    ///
    /// Default: `options` (swagger-ui-express renders `var options = {...};`).
    pub variable: String,

    /// Key inside the options object that holds the description.
    ///
    /// Default: `swaggerDoc`.
    pub field: String,

    /// Maximum nesting of objects/arrays the literal parser accepts.
    ///
    /// The page is untrusted input, so recursion is bounded. Default: 256.
    pub max_depth: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            variable: "options".to_string(),
            field: "swaggerDoc".to_string(),
            max_depth: 256,
        }
    }
}

impl ExtractorConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the assigned variable name.
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = variable.into();
        self
    }

    /// Set the description field name.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Set the parser nesting bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// How query and path parameters are filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamStyle {
    /// `null` for required parameters, the unset marker otherwise.
    #[default]
    Placeholder,

    /// Sample values from `default`/`type`, like the body fields.
    Inferred,
}

impl std::str::FromStr for ParamStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(Self::Placeholder),
            "inferred" => Ok(Self::Inferred),
            other => Err(format!("unknown parameter style: {other}")),
        }
    }
}

/// Options for the example synthesizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisOptions {
    /// Parameter placeholder style.
    #[serde(default)]
    pub param_style: ParamStyle,

    /// Hard cap on `$ref` expansion depth.
    ///
    /// Cycles are already cut by tracking the references being expanded;
    /// this only bounds very long acyclic chains. Default: 64.
    pub max_depth: usize,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            param_style: ParamStyle::Placeholder,
            max_depth: 64,
        }
    }
}

impl SynthesisOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parameter style.
    pub fn with_param_style(mut self, style: ParamStyle) -> Self {
        self.param_style = style;
        self
    }

    /// Set the reference expansion depth cap.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
