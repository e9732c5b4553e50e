//! Shared application state.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::RelayError;
use crate::pipeline::extract::{PdfTextExtractor, TextExtractor};
use crate::pipeline::summarize::{OpenAiSummarizer, Summarizer};

/// State shared by every request handler.
///
/// The extractor and summariser are trait objects so tests can swap in
/// deterministic stubs; [`AppState::new`] wires the production
/// implementations.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub extractor: Arc<dyn TextExtractor>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl AppState {
    /// Build the production state: pdf-extract for extraction, the
    /// chat-completions client for summarisation.
    pub fn new(config: AppConfig) -> Result<Self, RelayError> {
        let config = Arc::new(config);
        let summarizer = OpenAiSummarizer::new(config.clone())?;

        Ok(Self {
            config,
            extractor: Arc::new(PdfTextExtractor),
            summarizer: Arc::new(summarizer),
        })
    }
}
