//! Fetch → extract → synthesize.
//!
//! The pipeline runs each stage to completion and surfaces the first
//! failure as-is. There are no retries and no partial results.

use tracing::{debug, info, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::extractor::Extractor;
use crate::synthesizer::Synthesizer;
use crate::traits::fetcher::DocumentFetcher;
use crate::types::config::{ExtractorConfig, SynthesisOptions};
use crate::types::example::ExampleEntry;

/// Extract then synthesize, for page text already in hand.
pub fn examples_from_text(raw: &str) -> PipelineResult<Vec<ExampleEntry>> {
    let doc = crate::extractor::extract(raw)?;
    Ok(crate::synthesizer::synthesize(&doc)?)
}

/// The end-to-end transformation behind one fetcher.
pub struct Pipeline<F: DocumentFetcher> {
    fetcher: F,
    extractor: Extractor,
    synthesizer: Synthesizer,
}

impl<F: DocumentFetcher> Pipeline<F> {
    /// Create a pipeline with default extractor and synthesizer settings.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            extractor: Extractor::default(),
            synthesizer: Synthesizer::default(),
        }
    }

    pub fn with_extractor_config(mut self, config: ExtractorConfig) -> Self {
        self.extractor = Extractor::new(config);
        self
    }

    pub fn with_synthesis_options(mut self, options: SynthesisOptions) -> Self {
        self.synthesizer = Synthesizer::new(options);
        self
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    /// Fetch the page at `url` and synthesize its examples.
    pub async fn run(&self, url: &str) -> PipelineResult<Vec<ExampleEntry>> {
        self.run_with(url, &self.synthesizer).await
    }

    /// Synthesize examples from page text.
    pub fn run_text(&self, raw: &str) -> PipelineResult<Vec<ExampleEntry>> {
        self.run_text_with(raw, &self.synthesizer)
    }

    /// Like [`run_text`](Self::run_text) with a one-off synthesizer.
    pub fn run_text_with(
        &self,
        raw: &str,
        synthesizer: &Synthesizer,
    ) -> PipelineResult<Vec<ExampleEntry>> {
        let doc = self.extractor.extract(raw).map_err(|e| {
            warn!(error = %e, "Extraction failed");
            PipelineError::Extraction(e)
        })?;

        let entries = synthesizer.synthesize(&doc).map_err(|e| {
            warn!(error = %e, "Synthesis failed");
            PipelineError::Synthesis(e)
        })?;

        info!(entries = entries.len(), "Synthesized API examples");
        Ok(entries)
    }

    /// Like [`run`](Self::run) with a one-off synthesizer.
    pub async fn run_with(
        &self,
        url: &str,
        synthesizer: &Synthesizer,
    ) -> PipelineResult<Vec<ExampleEntry>> {
        info!(url = %url, "Fetching API documentation");
        let raw = self.fetcher.fetch(url).await.map_err(|e| {
            warn!(url = %url, error = %e, "Documentation fetch failed");
            PipelineError::Fetch(e)
        })?;
        debug!(url = %url, bytes = raw.len(), "Documentation fetched");

        self.run_text_with(&raw, synthesizer)
    }
}
