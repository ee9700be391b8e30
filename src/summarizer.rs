//! OCR → text cleanup → language-model summary

use crate::llm::json::extract_json_object;
use crate::llm::{prompts, LanguageModel};
use crate::ocr::{extract_clean_text, OcrError, OcrProvider};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Title used when the model's summary names no project
pub const UNTITLED_PROJECT: &str = "Untitled Project";

/// Summary of a project proposal, kept exactly as the model shaped it.
///
/// The prompt asks for `projectTitle`, `projectSummary`, `keyFeatures` and
/// friends, but nothing is enforced: fields may be missing, null or of an
/// unexpected type, and unknown keys are carried along.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DocumentSummary(Map<String, Value>);

impl DocumentSummary {
    /// Best-effort summary when the model answered with something other
    /// than a JSON object
    pub fn from_raw_text(text: &str) -> Self {
        Self::from_fields(json!({
            "projectTitle": "Project Summary",
            "projectSummary": text,
            "rawSummary": text,
            "error": "Response was not in valid JSON format",
        }))
    }

    /// Summary recorded when the model call itself failed
    pub fn generation_failed(message: &str) -> Self {
        Self::from_fields(json!({
            "projectTitle": "Error Generating Summary",
            "projectSummary": "There was an error generating the project summary.",
            "error": message,
        }))
    }

    fn from_fields(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }

    fn text_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// `projectTitle` when the model returned it as a string
    pub fn project_title(&self) -> Option<&str> {
        self.text_field("projectTitle")
    }

    /// Title to show for the submission, never empty
    pub fn display_title(&self) -> &str {
        self.project_title()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED_PROJECT)
    }

    pub fn error(&self) -> Option<&str> {
        self.text_field("error")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Parse model output, falling back to a raw-text summary only when the
/// reply holds no JSON object at all
pub fn parse_summary(text: &str) -> DocumentSummary {
    match serde_json::from_str::<Value>(extract_json_object(text)) {
        Ok(Value::Object(fields)) => DocumentSummary(fields),
        Ok(other) => {
            warn!("Summary JSON was a {} rather than an object", json_kind(&other));
            DocumentSummary::from_raw_text(text)
        }
        Err(e) => {
            warn!("Summary was not valid JSON: {}", e);
            DocumentSummary::from_raw_text(text)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub struct DocumentSummarizer {
    ocr: Arc<dyn OcrProvider>,
    model: Arc<dyn LanguageModel>,
}

impl DocumentSummarizer {
    pub fn new(ocr: Arc<dyn OcrProvider>, model: Arc<dyn LanguageModel>) -> Self {
        Self { ocr, model }
    }

    /// Summarize already-extracted document text. Model failures are folded
    /// into the returned summary rather than propagated.
    pub async fn summarize_text(&self, text: &str) -> DocumentSummary {
        match self.model.generate(&prompts::document_summary(text)).await {
            Ok(response) => parse_summary(&response),
            Err(e) => {
                error!("Error generating summary with {}: {}", self.model.model_name(), e);
                DocumentSummary::generation_failed(&e.to_string())
            }
        }
    }

    /// Full pipeline over raw file bytes; only OCR failures are errors
    pub async fn summarize(&self, file_name: &str, bytes: Vec<u8>) -> Result<DocumentSummary, OcrError> {
        let ocr = self.ocr.extract(file_name, bytes).await?;
        let text = extract_clean_text(&ocr);
        info!("Extracted {} characters from {}", text.len(), file_name);

        Ok(self.summarize_text(&text).await)
    }
}
