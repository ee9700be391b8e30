use super::messages::{ApiErrorBody, GenerateRequest, GenerateResponse};
use crate::config::LlmConfig;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Language model API key is not configured")]
    MissingApiKey,

    #[error("Language model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Language model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Language model returned no text")]
    EmptyResponse,

    #[error("Language model response was not valid JSON: {0}")]
    InvalidJson(String),
}

/// Text-in, text-out generative model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run a single prompt and return the model's raw text
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier for logging
    fn model_name(&self) -> &str;
}

/// Client for the Gemini `generateContent` REST endpoint
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: "gemini-1.5-flash".to_string(),
            client,
        })
    }

    /// Build from config using the analysis/evaluation model
    pub fn from_config(cfg: &LlmConfig) -> Result<Self, LlmError> {
        Ok(Self::new(&cfg.api_key, &cfg.base_url, Duration::from_secs(cfg.timeout_secs))?
            .with_model(&cfg.model))
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!("Calling {} ({} prompt bytes)", self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateRequest::user_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        let text = body.text().ok_or(LlmError::EmptyResponse)?;

        info!("{} returned {} bytes", self.model, text.len());
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client(url: &str) -> GeminiClient {
        GeminiClient::new("test-key", url, Duration::from_secs(5))
            .unwrap()
            .with_model("gemini-test")
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::Regex(r#""text":"hello""#.to_string()))
            .with_status(200)
            .with_body(
                r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"score\":"},{"text":"90}"}]},"finishReason":"STOP"}]}"#,
            )
            .create_async()
            .await;

        let text = client(&server.url()).generate("hello").await.unwrap();

        assert_eq!(text, r#"{"score":90}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_surfaces_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"API key not valid"}}"#)
            .create_async()
            .await;

        let err = client(&server.url()).generate("hello").await.unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let err = client(&server.url()).generate("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let client = GeminiClient::new("  ", "http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }
}
