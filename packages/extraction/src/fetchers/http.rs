//! HTTP-based document fetcher.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult, SecurityError};
use crate::traits::fetcher::{DocumentFetcher, UrlValidator};

/// Default cap on a fetched page body (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Redirect hops followed before giving up, as reqwest's default policy.
const MAX_REDIRECTS: usize = 10;

/// Fetches documentation pages over HTTP(S).
///
/// Does no URL validation of its own; wrap it in
/// [`ValidatedFetcher`](crate::traits::fetcher::ValidatedFetcher) when the
/// URL comes from a caller. The wrapper also installs its validator on
/// every redirect hop.
///
/// # Example
///
/// ```rust,ignore
/// use apidoc_extraction::{HttpFetcher, ValidatedFetcher, DocumentFetcher};
///
/// let fetcher = ValidatedFetcher::new(HttpFetcher::new()?);
/// let page = fetcher.fetch("https://example.com/api-docs/swagger-ui-init.js").await?;
/// ```
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
    max_body_bytes: usize,
    /// Read by the client's redirect policy on each hop
    redirect_guard: Arc<RwLock<Option<UrlValidator>>>,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher with default settings.
    pub fn new() -> FetchResult<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a fetcher whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> FetchResult<Self> {
        let redirect_guard: Arc<RwLock<Option<UrlValidator>>> = Arc::default();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(redirect_policy(Arc::clone(&redirect_guard)))
            .build()
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        Ok(Self {
            client,
            user_agent: concat!("apidoc-extraction/", env!("CARGO_PKG_VERSION")).to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            redirect_guard,
        })
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Reject bodies larger than `max_body_bytes`.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    fn too_large(&self, url: &str) -> FetchError {
        warn!(url = %url, limit = self.max_body_bytes, "Response body over limit");
        FetchError::TooLarge {
            url: url.to_string(),
            limit: self.max_body_bytes,
        }
    }
}

/// Follow up to [`MAX_REDIRECTS`] hops, each checked against the guard's
/// validator once one is installed.
fn redirect_policy(guard: Arc<RwLock<Option<UrlValidator>>>) -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }

        let verdict = guard
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|validator| validator.validate(attempt.url().as_str()))
            .unwrap_or(Ok(()));

        match verdict {
            Ok(()) => attempt.follow(),
            Err(e) => {
                warn!(target_url = %attempt.url(), error = %e, "Blocked redirect");
                attempt.error(e)
            }
        }
    })
}

/// The validator's rejection, when a redirect was stopped by the policy.
fn redirect_rejection(error: &reqwest::Error) -> Option<String> {
    let mut source = std::error::Error::source(error);
    while let Some(err) = source {
        if let Some(security) = err.downcast_ref::<SecurityError>() {
            return Some(security.to_string());
        }
        source = err.source();
    }
    None
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        debug!(url = %url, "HTTP fetch starting");
        let mut response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                if let Some(rejection) = e.is_redirect().then(|| redirect_rejection(&e)).flatten() {
                    FetchError::Security(SecurityError::BlockedRedirect(rejection))
                } else if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(self.too_large(url));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url = %url, bytes = body.len(), "HTTP fetch complete");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn restrict_redirects(&mut self, validator: &UrlValidator) {
        *self
            .redirect_guard
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(validator.clone());
    }
}
