//! Fetcher implementations.
//!
//! - `HttpFetcher` - Direct HTTP(S) retrieval with timeout and user agent
//! - `ValidatedFetcher` - Wrapper that validates URLs for security

pub mod http;

pub use http::{HttpFetcher, DEFAULT_MAX_BODY_BYTES};

// Re-export the validated fetcher from traits
pub use crate::traits::fetcher::{UrlValidator, ValidatedFetcher};
