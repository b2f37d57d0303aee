//! Server dependencies for the refresh pipeline (using traits for testability)
//!
//! All external services sit behind trait objects so tests can swap in the
//! mocks from `test_dependencies`.

use std::sync::Arc;

use anyhow::Result;

use crate::config::{Config, ExtractionStrategy};
use crate::domains::substitutions::extraction::{build_extractor, SubstitutionExtractor};
use crate::kernel::{
    BaseAI, BaseDocumentFetcher, BaseTextExtractor, HttpDocumentFetcher, OpenAIClient,
    PdfTextExtractor,
};

/// Services the refresh orchestrator calls out to
#[derive(Clone)]
pub struct ServerDeps {
    pub fetcher: Arc<dyn BaseDocumentFetcher>,
    pub text_extractor: Arc<dyn BaseTextExtractor>,
    /// Strategy chosen at startup (pattern or interpreter)
    pub substitution_extractor: Arc<dyn SubstitutionExtractor>,
}

impl ServerDeps {
    pub fn new(
        fetcher: Arc<dyn BaseDocumentFetcher>,
        text_extractor: Arc<dyn BaseTextExtractor>,
        substitution_extractor: Arc<dyn SubstitutionExtractor>,
    ) -> Self {
        Self {
            fetcher,
            text_extractor,
            substitution_extractor,
        }
    }

    /// Production wiring from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let ai: Option<Arc<dyn BaseAI>> = match (&config.interpreter, config.extraction_strategy) {
            (Some(interpreter), ExtractionStrategy::Interpreter) => {
                Some(Arc::new(OpenAIClient::new(interpreter)?) as Arc<dyn BaseAI>)
            }
            _ => None,
        };

        Ok(Self::new(
            Arc::new(HttpDocumentFetcher::new(config.accept_invalid_certs)?),
            Arc::new(PdfTextExtractor::new(config.pdf_timeout)),
            build_extractor(config.extraction_strategy, ai)?,
        ))
    }
}
