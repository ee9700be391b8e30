pub mod client;
pub mod json;
pub mod messages;
pub mod prompts;

pub use client::{GeminiClient, LanguageModel, LlmError};
