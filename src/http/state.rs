use crate::analyzer::PresentationAnalyzer;
use crate::config::{Config, StoreBackend};
use crate::evaluator::Evaluator;
use crate::intake::SubmissionIntake;
use crate::llm::{GeminiClient, LanguageModel};
use crate::meeting::{MeetingStore, MemoryStore, SledStore};
use crate::ocr::{MistralOcr, OcrProvider};
use crate::summarizer::DocumentSummarizer;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MeetingStore>,
    pub intake: Arc<SubmissionIntake>,
    pub summarizer: Arc<DocumentSummarizer>,
    pub analyzer: Arc<PresentationAnalyzer>,
    pub evaluator: Arc<Evaluator>,
    /// Base for `submissionLink`, without trailing slash
    pub public_base_url: String,
}

impl AppState {
    /// Wire the services around explicit collaborators
    pub fn new(
        store: Arc<dyn MeetingStore>,
        ocr: Arc<dyn OcrProvider>,
        model: Arc<dyn LanguageModel>,
        summary_model: Arc<dyn LanguageModel>,
        public_base_url: &str,
    ) -> Self {
        let summarizer = Arc::new(DocumentSummarizer::new(ocr, summary_model));
        Self {
            intake: Arc::new(SubmissionIntake::new(
                Arc::clone(&store),
                Arc::clone(&summarizer),
            )),
            analyzer: Arc::new(PresentationAnalyzer::new(Arc::clone(&model))),
            evaluator: Arc::new(Evaluator::new(model)),
            summarizer,
            store,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the production wiring: configured store, Gemini and Mistral clients
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let store: Arc<dyn MeetingStore> = match cfg.store.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Sled => Arc::new(
                SledStore::open(&cfg.store.path).context("Failed to open meeting database")?,
            ),
        };
        info!("Meeting store: {}", store.name());

        let model = GeminiClient::from_config(&cfg.llm).context("Failed to build LLM client")?;
        let summary_model = GeminiClient::from_config(&cfg.llm)
            .context("Failed to build LLM client")?
            .with_model(&cfg.llm.summary_model);
        let ocr = MistralOcr::from_config(&cfg.ocr).context("Failed to build OCR client")?;

        Ok(Self::new(
            store,
            Arc::new(ocr),
            Arc::new(model),
            Arc::new(summary_model),
            &cfg.service.public_base_url,
        ))
    }

    pub fn submission_link(&self, meeting_id: &str) -> String {
        format!("{}/submit/{}", self.public_base_url, meeting_id)
    }
}
