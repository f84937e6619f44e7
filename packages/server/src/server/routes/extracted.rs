use apidoc_extraction::{ExampleEntry, ParamStyle, SynthesisOptions, Synthesizer};
use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::Deserialize;

use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ExtractedQuery {
    /// Documentation page to fetch
    #[serde(rename = "swaggerUrl")]
    pub swagger_url: Option<String>,

    /// `placeholder` or `inferred`; the configured style when absent
    pub params: Option<String>,
}

impl ExtractedQuery {
    fn synthesizer(&self, state: &AppState) -> Result<Synthesizer, ApiError> {
        let mut options: SynthesisOptions = state.pipeline.synthesizer().options().clone();
        if let Some(style) = self.params.as_deref() {
            options.param_style = style.parse::<ParamStyle>().map_err(ApiError::BadRequest)?;
        }
        Ok(Synthesizer::new(options))
    }
}

/// Fetch the documentation page at `swaggerUrl` and return one example
/// request per documented operation.
pub async fn extracted_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ExtractedQuery>,
) -> Result<Json<Vec<ExampleEntry>>, ApiError> {
    let url = query
        .swagger_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::BadRequest("swaggerUrl query parameter is required".to_string()))?;

    let synthesizer = query.synthesizer(&state)?;
    let entries = state.pipeline.run_with(url, &synthesizer).await?;
    Ok(Json(entries))
}

/// Same as [`extracted_handler`] for a page body posted as text.
pub async fn extracted_text_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ExtractedQuery>,
    body: String,
) -> Result<Json<Vec<ExampleEntry>>, ApiError> {
    let synthesizer = query.synthesizer(&state)?;
    let entries = state.pipeline.run_text_with(&body, &synthesizer)?;
    Ok(Json(entries))
}
