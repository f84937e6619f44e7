//! API-Documentation Example Extraction Library
//!
//! Recovers the Swagger description that documentation pages embed as
//! `var options = { swaggerDoc: {...} };` and derives one example request
//! per operation, for driving API exploration or test-stub generation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use apidoc_extraction::{extract, synthesize};
//!
//! let doc = extract(&page_text)?;
//! for entry in synthesize(&doc)? {
//!     println!("{} {}", entry.method, entry.path);
//! }
//!
//! // Or fetch and run the whole thing
//! let pipeline = Pipeline::new(ValidatedFetcher::new(HttpFetcher::new()?));
//! let entries = pipeline.run("https://example.com/api-docs/swagger-ui-init.js").await?;
//! ```
//!
//! # Modules
//!
//! - [`extractor`] - Locate and parse the embedded object literal
//! - [`synthesizer`] - Example values, `$ref` resolution, parameter merging
//! - [`pipeline`] - Fetch → extract → synthesize
//! - [`traits`] - Fetcher abstraction and SSRF protection
//! - [`fetchers`] - Fetcher implementations (HttpFetcher, etc.)
//! - [`types`] - Document, example and configuration types
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod extractor;
pub mod fetchers;
pub mod pipeline;
pub mod synthesizer;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    ExtractionError, FetchError, LiteralError, LiteralErrorKind, PipelineError, SecurityError,
    SynthesisError,
};
pub use extractor::{extract, parse_literal, Extractor};
pub use fetchers::{HttpFetcher, UrlValidator, ValidatedFetcher, DEFAULT_MAX_BODY_BYTES};
pub use pipeline::{examples_from_text, Pipeline};
pub use synthesizer::{build_example, synthesize, Synthesizer};
pub use traits::fetcher::DocumentFetcher;
pub use types::{
    config::{ExtractorConfig, ParamStyle, SynthesisOptions},
    document::ApiDescription,
    example::{ExampleBody, ExampleEntry, ParamPlaceholder, UNSET_MARKER},
};
