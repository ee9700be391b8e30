use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub store: StoreConfig,
    pub llm: LlmConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
    /// Base URL used to build team submission links
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Sled,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Database directory for the sled backend
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    /// Model used for transcript analysis and evaluation
    pub model: String,
    /// Model used for document summarization
    pub summary_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from an optional file plus `JUDGE__*` environment
    /// variables. The well-known provider variables (`GEMINI_API_KEY`,
    /// `MISTRAL_API_KEY`, `PUBLIC_BASE_URL`) are honoured as overrides.
    pub fn load(path: &str) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("service.name", "hackathon-judge")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 3000)?
            .set_default("service.public_base_url", "http://localhost:3000")?
            .set_default("store.backend", "memory")?
            .set_default("store.path", "data/meetings")?
            .set_default("llm.api_key", "")?
            .set_default("llm.base_url", "https://generativelanguage.googleapis.com")?
            .set_default("llm.model", "gemini-1.5-flash")?
            .set_default("llm.summary_model", "gemini-1.5-pro")?
            .set_default("llm.timeout_secs", 120)?
            .set_default("ocr.api_key", "")?
            .set_default("ocr.base_url", "https://api.mistral.ai")?
            .set_default("ocr.model", "mistral-ocr-latest")?
            .set_default("ocr.timeout_secs", 120)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("JUDGE").separator("__"));

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            builder = builder.set_override("llm.api_key", key)?;
        }
        if let Ok(key) = std::env::var("MISTRAL_API_KEY") {
            builder = builder.set_override("ocr.api_key", key)?;
        }
        if let Ok(url) = std::env::var("PUBLIC_BASE_URL") {
            builder = builder.set_override("service.public_base_url", url)?;
        }

        let settings = builder.build().context("Failed to build configuration")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
