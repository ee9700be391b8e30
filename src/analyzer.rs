//! Presentation transcript analysis

use crate::llm::json::parse_fenced;
use crate::llm::{prompts, LanguageModel, LlmError};
use crate::meeting::PresentationAnalysis;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Shape the model must answer with; every category is required
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisReply {
    pros: Vec<String>,
    cons: Vec<String>,
    suggested_questions: Vec<String>,
}

pub struct PresentationAnalyzer {
    model: Arc<dyn LanguageModel>,
}

impl PresentationAnalyzer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Ask the model for pros, cons and follow-up questions. Any failure,
    /// including an unparseable reply, is returned as an error.
    pub async fn analyze(&self, transcript: &str) -> Result<PresentationAnalysis, LlmError> {
        let text = self
            .model
            .generate(&prompts::presentation_analysis(transcript))
            .await?;
        let reply: AnalysisReply = parse_fenced(&text)?;

        info!(
            "Analysis produced {} pros, {} cons, {} questions",
            reply.pros.len(),
            reply.cons.len(),
            reply.suggested_questions.len()
        );

        Ok(PresentationAnalysis {
            pros: reply.pros,
            cons: reply.cons,
            suggested_questions: reply.suggested_questions,
        })
    }
}
