//! Fetcher trait and URL validation for SSRF protection.
//!
//! The documentation URL comes from the caller, so the page fetch is the
//! one place untrusted input reaches the network.

use async_trait::async_trait;
use std::collections::HashSet;
use std::net::IpAddr;

use tracing::warn;

use crate::error::{FetchError, FetchResult, SecurityError, SecurityResult};

/// Retrieves the raw text of a documentation page.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the page body at `url` as text.
    async fn fetch(&self, url: &str) -> FetchResult<String>;

    /// Check every redirect hop against `validator`.
    ///
    /// Fetchers that follow redirects must override this; the default is
    /// for fetchers that never leave the requested URL.
    fn restrict_redirects(&mut self, _validator: &UrlValidator) {}
}

#[async_trait]
impl<F: DocumentFetcher + ?Sized> DocumentFetcher for std::sync::Arc<F> {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        (**self).fetch(url).await
    }

    fn restrict_redirects(&mut self, validator: &UrlValidator) {
        match std::sync::Arc::get_mut(self) {
            Some(inner) => inner.restrict_redirects(validator),
            None => warn!("Shared fetcher, redirect hops are not validated"),
        }
    }
}

const BLOCKED_HOSTS: [&str; 8] = [
    "localhost",
    "127.0.0.1",
    "::1",
    "[::1]",
    "0.0.0.0",
    "metadata.google.internal",
    "metadata.gke.internal",
    "instance-data",
];

const BLOCKED_CIDRS: [&str; 9] = [
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "169.254.0.0/16", // Link-local / cloud metadata
    "127.0.0.0/8",    // Loopback
    "0.0.0.0/8",
    "::1/128",   // IPv6 loopback
    "fc00::/7",  // IPv6 private
    "fe80::/10", // IPv6 link-local
];

/// URL validator for SSRF protection.
///
/// Validates URLs before fetching to prevent:
/// - Access to internal services (localhost, 127.0.0.1)
/// - Access to private IP ranges (10.x, 172.16.x, 192.168.x)
/// - Access to cloud metadata services (169.254.x)
/// - Non-HTTP(S) schemes (file://, ftp://)
#[derive(Debug, Clone)]
pub struct UrlValidator {
    /// Allowed URL schemes
    allowed_schemes: HashSet<String>,

    /// Blocked hostnames
    blocked_hosts: HashSet<String>,

    /// Blocked CIDR ranges
    blocked_cidrs: Vec<ipnet::IpNet>,

    /// Additional allowed hosts (bypass normal validation)
    allowed_hosts: HashSet<String>,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlValidator {
    /// Create a new URL validator with default security rules.
    pub fn new() -> Self {
        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            blocked_hosts: BLOCKED_HOSTS.into_iter().map(String::from).collect(),
            blocked_cidrs: BLOCKED_CIDRS
                .into_iter()
                .filter_map(|cidr| cidr.parse().ok())
                .collect(),
            allowed_hosts: HashSet::new(),
        }
    }

    /// Add an allowed host (bypasses validation).
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into());
        self
    }

    /// Validate a URL for safety.
    pub fn validate(&self, url: &str) -> SecurityResult<()> {
        let parsed = url::Url::parse(url)?;

        if !self.allowed_schemes.contains(parsed.scheme()) {
            return Err(SecurityError::DisallowedScheme(parsed.scheme().to_string()));
        }

        let host = parsed.host_str().ok_or(SecurityError::NoHost)?;

        if self.allowed_hosts.contains(host) {
            return Ok(());
        }

        if self.blocked_hosts.contains(host) {
            return Err(SecurityError::BlockedHost(host.to_string()));
        }

        // IPv6 hosts come back bracketed
        let bare = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = bare.parse::<IpAddr>() {
            self.check_ip(ip)?;
        }

        Ok(())
    }

    /// Validate a URL and resolve DNS to check the actual IP.
    ///
    /// This catches DNS rebinding attacks where a hostname resolves
    /// to an internal IP.
    pub async fn validate_with_dns(&self, url: &str) -> SecurityResult<()> {
        self.validate(url)?;

        let parsed = url::Url::parse(url)?;
        let host = parsed.host_str().ok_or(SecurityError::NoHost)?;

        if self.allowed_hosts.contains(host) {
            return Ok(());
        }

        let bare = host.trim_start_matches('[').trim_end_matches(']');
        if bare.parse::<IpAddr>().is_ok() {
            return Ok(());
        }

        let port = parsed.port_or_known_default().unwrap_or(80);
        let addrs = tokio::net::lookup_host(format!("{}:{}", host, port))
            .await
            .map_err(|e| SecurityError::DnsResolution(e.to_string()))?;

        for addr in addrs {
            let ip = addr.ip();
            if self.blocked_cidrs.iter().any(|cidr| cidr.contains(&ip)) {
                return Err(SecurityError::BlockedCidr(format!(
                    "DNS for {} resolved to blocked IP {}",
                    host, ip
                )));
            }
        }

        Ok(())
    }

    fn check_ip(&self, ip: IpAddr) -> SecurityResult<()> {
        if self.blocked_cidrs.iter().any(|cidr| cidr.contains(&ip)) {
            return Err(SecurityError::BlockedCidr(ip.to_string()));
        }
        Ok(())
    }
}

/// A fetcher that validates URLs before fetching.
pub struct ValidatedFetcher<F: DocumentFetcher> {
    inner: F,
    validator: UrlValidator,
}

impl<F: DocumentFetcher> ValidatedFetcher<F> {
    /// Create a new validated fetcher.
    pub fn new(fetcher: F) -> Self {
        Self::with_validator(fetcher, UrlValidator::new())
    }

    /// Create with a custom validator.
    ///
    /// The validator is also handed to the inner fetcher so redirect
    /// targets get the same checks as the requested URL.
    pub fn with_validator(mut fetcher: F, validator: UrlValidator) -> Self {
        fetcher.restrict_redirects(&validator);
        Self {
            inner: fetcher,
            validator,
        }
    }
}

#[async_trait]
impl<F: DocumentFetcher> DocumentFetcher for ValidatedFetcher<F> {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.validator
            .validate_with_dns(url)
            .await
            .map_err(FetchError::Security)?;

        self.inner.fetch(url).await
    }

    fn restrict_redirects(&mut self, validator: &UrlValidator) {
        self.inner.restrict_redirects(validator);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    #[test]
    fn test_blocks_localhost() {
        let validator = UrlValidator::new();
        assert!(validator.validate("http://localhost/docs").is_err());
        assert!(validator.validate("http://127.0.0.1/").is_err());
        assert!(validator.validate("http://[::1]/").is_err());
    }

    #[test]
    fn test_blocks_private_ips() {
        let validator = UrlValidator::new();
        assert!(validator.validate("http://10.0.0.1/").is_err());
        assert!(validator.validate("http://172.16.0.1/").is_err());
        assert!(validator.validate("http://192.168.1.1/").is_err());
        assert!(validator.validate("http://[fd00::1]/").is_err());
    }

    #[test]
    fn test_blocks_metadata_services() {
        let validator = UrlValidator::new();
        assert!(validator.validate("http://169.254.169.254/").is_err());
        assert!(validator.validate("http://metadata.google.internal/").is_err());
    }

    #[test]
    fn test_blocks_non_http() {
        let validator = UrlValidator::new();
        assert!(matches!(
            validator.validate("file:///etc/passwd"),
            Err(SecurityError::DisallowedScheme(_))
        ));
        assert!(validator.validate("ftp://example.com/").is_err());
        assert!(matches!(
            validator.validate("not a url"),
            Err(SecurityError::UrlParse(_))
        ));
    }

    #[test]
    fn test_allows_public_urls() {
        let validator = UrlValidator::new();
        assert!(validator.validate("https://example.com/api-docs/").is_ok());
        assert!(validator.validate("http://93.184.216.34/docs").is_ok());
    }

    #[test]
    fn test_allowed_hosts_bypass() {
        let validator = UrlValidator::new().allow_host("localhost");
        assert!(validator.validate("http://localhost:3000/api-docs").is_ok());
    }

    #[tokio::test]
    async fn test_validated_fetcher_rejects_before_fetching() {
        let mock = MockFetcher::new().with_page("http://127.0.0.1/docs", "var options = {};");
        let fetcher = ValidatedFetcher::new(mock.clone());

        let err = fetcher.fetch("http://127.0.0.1/docs").await.unwrap_err();
        assert!(matches!(err, FetchError::Security(_)));
        assert!(mock.calls().is_empty());
    }

    /// Records the validator it was asked to apply to redirects.
    #[derive(Default)]
    struct RedirectRecorder {
        validator: Option<UrlValidator>,
    }

    #[async_trait]
    impl DocumentFetcher for RedirectRecorder {
        async fn fetch(&self, url: &str) -> FetchResult<String> {
            Ok(url.to_string())
        }

        fn restrict_redirects(&mut self, validator: &UrlValidator) {
            self.validator = Some(validator.clone());
        }
    }

    #[test]
    fn test_validated_fetcher_installs_redirect_validator() {
        let fetcher = ValidatedFetcher::with_validator(
            RedirectRecorder::default(),
            UrlValidator::new().allow_host("localhost"),
        );
        let installed = fetcher.inner.validator.as_ref().unwrap();
        assert!(installed.validate("http://localhost/next").is_ok());
        assert!(installed.validate("http://10.0.0.1/next").is_err());
    }

    #[test]
    fn test_redirect_validator_reaches_through_unique_arc() {
        let shared = std::sync::Arc::new(RedirectRecorder::default());
        let fetcher = ValidatedFetcher::new(shared);
        assert!(fetcher.inner.validator.is_some());
    }

    #[tokio::test]
    async fn test_validated_fetcher_passes_allowed_hosts() {
        let mock = MockFetcher::new().with_page("http://localhost/docs", "body");
        let fetcher =
            ValidatedFetcher::with_validator(mock, UrlValidator::new().allow_host("localhost"));

        assert_eq!(fetcher.fetch("http://localhost/docs").await.unwrap(), "body");
    }
}
