//! Test harness driving the router in-process.
//!
//! Requests go through `tower::ServiceExt::oneshot`, so no socket is bound
//! and documentation pages are served from a `MockFetcher`.

use std::sync::Arc;

use apidoc_extraction::testing::MockFetcher;
use apidoc_extraction::{Pipeline, SynthesisOptions};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use server_core::server::{build_router, AppState, SharedFetcher};
use tower::ServiceExt;

/// Documentation URL most tests register pages under.
pub const DOCS_URL: &str = "https://docs.example.com/api-docs/swagger-ui-init.js";

pub struct TestApp {
    pub router: Router,
    pub fetcher: MockFetcher,
}

impl TestApp {
    pub fn new(fetcher: MockFetcher) -> Self {
        Self::with_options(fetcher, SynthesisOptions::default())
    }

    pub fn with_options(fetcher: MockFetcher, options: SynthesisOptions) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let shared: SharedFetcher = Arc::new(fetcher.clone());
        let pipeline = Pipeline::new(shared).with_synthesis_options(options);
        let router = build_router(AppState::new(pipeline), &[]);

        Self { router, fetcher }
    }

    /// Send a request and decode the JSON response body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    pub async fn post_text(&self, uri: &str, text: impl Into<String>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "text/plain")
            .body(Body::from(text.into()))
            .expect("valid request");
        self.send(request).await
    }
}

/// `?swaggerUrl=` query for `url`, percent-encoding the reserved characters
/// that appear in test URLs.
pub fn extracted_uri(url: &str) -> String {
    let encoded = url.replace(':', "%3A").replace('/', "%2F");
    format!("/extracted?swaggerUrl={encoded}")
}
