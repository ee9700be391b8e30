pub mod client;
pub mod text;
pub mod types;

pub use client::{MistralOcr, OcrError, OcrProvider};
pub use text::{clean_markdown, extract_clean_text};
pub use types::OcrResponse;
