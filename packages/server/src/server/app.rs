//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use apidoc_extraction::{
    DocumentFetcher, ExtractorConfig, HttpFetcher, Pipeline, SynthesisOptions, ValidatedFetcher,
};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::server::routes::{extracted_handler, extracted_text_handler, health_handler};

/// Fetcher shared by every request
pub type SharedFetcher = Arc<dyn DocumentFetcher>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline<SharedFetcher>>,
}

impl AppState {
    pub fn new(pipeline: Pipeline<SharedFetcher>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// State wired from configuration: HTTP fetcher behind the SSRF guard
    /// unless private hosts are explicitly allowed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = HttpFetcher::with_timeout(Duration::from_secs(config.fetch_timeout_secs))
            .context("Failed to build HTTP client")?
            .with_user_agent(config.fetch_user_agent.clone())
            .with_max_body_bytes(config.fetch_max_bytes);

        let fetcher: SharedFetcher = if config.allow_private_hosts {
            tracing::warn!("ALLOW_PRIVATE_HOSTS is set, swaggerUrl is not validated");
            Arc::new(http)
        } else {
            Arc::new(ValidatedFetcher::new(http))
        };

        let pipeline = Pipeline::new(fetcher)
            .with_extractor_config(
                ExtractorConfig::new()
                    .with_variable(config.options_variable.clone())
                    .with_field(config.description_field.clone()),
            )
            .with_synthesis_options(SynthesisOptions::new().with_param_style(config.param_style));

        Ok(Self::new(pipeline))
    }
}

/// Build the Axum application router from configuration
pub fn build_app(config: &Config) -> Result<Router> {
    let state = AppState::from_config(config)?;
    Ok(build_router(state, &config.cors_allowed_origins))
}

/// Build the router around an existing state
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    // CORS configuration - allow any origin unless a list is configured
    let origins = if allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/extracted", get(extracted_handler).post(extracted_text_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
