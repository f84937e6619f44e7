//! Testing utilities including mock implementations.
//!
//! Useful for testing applications that use the extraction library without
//! making network calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::DocumentFetcher;

/// A mock fetcher serving pages from memory.
///
/// Clones share the same pages and call log.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    /// Page bodies by URL
    pages: Arc<RwLock<HashMap<String, String>>>,

    /// URLs that answer with an HTTP status instead of a body
    statuses: Arc<RwLock<HashMap<String, u16>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        if let Ok(mut pages) = self.pages.write() {
            pages.insert(url.into(), body.into());
        }
        self
    }

    /// Answer `url` with a non-success status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        if let Ok(mut statuses) = self.statuses.write() {
            statuses.insert(url.into(), status);
        }
        self
    }

    /// URLs fetched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DocumentFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        if let Ok(mut calls) = self.calls.write() {
            calls.push(url.to_string());
        }

        let status = self.statuses.read().ok().and_then(|s| s.get(url).copied());
        if let Some(status) = status {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        self.pages
            .read()
            .ok()
            .and_then(|pages| pages.get(url).cloned())
            .ok_or_else(|| FetchError::NotFound {
                url: url.to_string(),
            })
    }
}

/// Wrap a description object in the page markup docs middleware renders.
pub fn docs_page(swagger_doc: &serde_json::Value) -> String {
    format!(
        r#"window.onload = function() {{
  // Build a system
  var url = window.location.search.match(/url=([^&]+)/);
  if (url && url.length > 1) {{
    url = decodeURIComponent(url[1]);
  }} else {{
    url = window.location.origin;
  }}
  var options = {{
  "swaggerDoc": {doc},
  "customOptions": {{}}
}};
  url = options.swaggerUrl || url
  var urls = options.swaggerUrls
  var customOptions = options.customOptions
  var spec1 = options.swaggerDoc
}}
"#,
        doc = swagger_doc
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_fetcher_serves_and_records() {
        let fetcher = MockFetcher::new()
            .with_page("https://docs.example.com/init.js", "body")
            .with_status("https://docs.example.com/down", 503);

        assert_eq!(fetcher.fetch("https://docs.example.com/init.js").await.unwrap(), "body");
        assert!(matches!(
            fetcher.fetch("https://docs.example.com/down").await,
            Err(FetchError::Status { status: 503, .. })
        ));
        assert!(matches!(
            fetcher.fetch("https://docs.example.com/other").await,
            Err(FetchError::NotFound { .. })
        ));
        assert_eq!(fetcher.calls().len(), 3);
    }

    #[test]
    fn test_docs_page_is_extractable() {
        let page = docs_page(&json!({"paths": {"/ping": {"get": {}}}}));
        let doc = crate::extract(&page).unwrap();
        assert!(doc.paths().unwrap().contains_key("/ping"));
    }
}
