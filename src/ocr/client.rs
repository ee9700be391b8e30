use super::types::{DocumentRef, OcrRequest, OcrResponse, SignedUrl, UploadedFile};
use crate::config::OcrConfig;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR API key is not configured")]
    MissingApiKey,

    #[error("OCR request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OCR API returned {status} during {stage}: {message}")]
    Api {
        stage: &'static str,
        status: u16,
        message: String,
    },
}

/// Turns raw document bytes into an OCR result
#[async_trait]
pub trait OcrProvider: Send + Sync {
    async fn extract(&self, file_name: &str, bytes: Vec<u8>) -> Result<OcrResponse, OcrError>;
}

/// Client for the Mistral OCR API: upload, sign, then process
pub struct MistralOcr {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl MistralOcr {
    pub fn new(api_key: &str, base_url: &str, model: &str, timeout: Duration) -> Result<Self, OcrError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        })
    }

    pub fn from_config(cfg: &OcrConfig) -> Result<Self, OcrError> {
        Self::new(
            &cfg.api_key,
            &cfg.base_url,
            &cfg.model,
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    async fn check(
        stage: &'static str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, OcrError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(OcrError::Api {
            stage,
            status: status.as_u16(),
            message,
        })
    }

    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadedFile, OcrError> {
        let form = Form::new()
            .text("purpose", "ocr")
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        let response = self
            .client
            .post(format!("{}/v1/files", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        Ok(Self::check("upload", response).await?.json().await?)
    }

    async fn signed_url(&self, file_id: &str) -> Result<SignedUrl, OcrError> {
        let response = self
            .client
            .get(format!("{}/v1/files/{}/url", self.base_url, file_id))
            .query(&[("expiry", "24")])
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Ok(Self::check("signed url", response).await?.json().await?)
    }

    async fn process(&self, document_url: String) -> Result<OcrResponse, OcrError> {
        let request = OcrRequest {
            model: self.model.clone(),
            document: DocumentRef::DocumentUrl { document_url },
        };

        let response = self
            .client
            .post(format!("{}/v1/ocr", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        Ok(Self::check("ocr", response).await?.json().await?)
    }
}

#[async_trait]
impl OcrProvider for MistralOcr {
    async fn extract(&self, file_name: &str, bytes: Vec<u8>) -> Result<OcrResponse, OcrError> {
        if self.api_key.is_empty() {
            return Err(OcrError::MissingApiKey);
        }

        info!("Uploading {} ({} bytes) for OCR", file_name, bytes.len());
        let uploaded = self.upload(file_name, bytes).await?;
        let signed = self.signed_url(&uploaded.id).await?;
        let result = self.process(signed.url).await?;

        info!("OCR of {} produced {} pages", file_name, result.pages.len());
        Ok(result)
    }
}
