//! Typed errors for the extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell
//! fetch failures apart from extraction and synthesis failures.

use thiserror::Error;

/// Errors raised while pulling the API description out of a page.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No `var <name> = {...};` assignment in the page
    #[error("pattern not found")]
    PatternNotFound,

    /// The assignment was found but its literal could not be parsed
    #[error("invalid object literal: {0}")]
    InvalidLiteral(#[from] LiteralError),

    /// The literal parsed but carries no description object
    #[error("missing description field")]
    MissingDescription { field: String },
}

/// Position-tagged failure of the data-literal parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct LiteralError {
    pub kind: LiteralErrorKind,
    /// 1-based
    pub line: usize,
    /// 1-based, counted in characters
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),

    /// Bare identifiers other than the literal keywords are not data
    #[error("unsupported expression `{0}`")]
    UnsupportedExpression(String),

    #[error("invalid escape sequence")]
    InvalidEscape,

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("unterminated string")]
    UnterminatedString,

    #[error("unterminated comment")]
    UnterminatedComment,

    #[error("template substitutions are not supported")]
    TemplateSubstitution,

    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),

    #[error("trailing characters after literal")]
    TrailingCharacters,
}

/// Errors raised while turning a description into example entries.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The document has no `paths` mapping at all
    #[error("document has no operations")]
    NoOperations,
}

/// Errors that can occur while retrieving the documentation page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Security validation failed
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Connection timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Body exceeds the configured size cap
    #[error("response from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },

    /// No document registered for the URL (mock fetcher)
    #[error("document not found: {url}")]
    NotFound { url: String },
}

/// Security-related errors, primarily for SSRF protection.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, metadata endpoints)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    DnsResolution(String),

    /// A redirect pointed at a target the validator rejects
    #[error("redirect blocked: {0}")]
    BlockedRedirect(String),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Any failure of the fetch → extract → synthesize pipeline.
///
/// Each stage keeps its own variant so the boundary can report them
/// distinctly. Nothing is retried. Fetch details (resolved addresses,
/// blocked ranges) stay in the source chain and out of the message.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch failed")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for the literal parser.
pub type LiteralResult<T> = std::result::Result<T, LiteralError>;

/// Result type alias for synthesis operations.
pub type SynthesisResult<T> = std::result::Result<T, SynthesisError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;

/// Result type alias for the whole pipeline.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_message_hides_detail() {
        let err = PipelineError::from(FetchError::Security(SecurityError::BlockedCidr(
            "DNS for docs.example.com resolved to blocked IP 10.0.0.5".to_string(),
        )));
        assert_eq!(err.to_string(), "fetch failed");

        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert!(source.unwrap().contains("10.0.0.5"));
    }
}
