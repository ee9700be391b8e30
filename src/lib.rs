pub mod analyzer;
pub mod config;
pub mod evaluator;
pub mod http;
pub mod intake;
pub mod llm;
pub mod meeting;
pub mod ocr;
pub mod summarizer;

pub use analyzer::PresentationAnalyzer;
pub use config::Config;
pub use evaluator::{leaderboard, Evaluation, Evaluator, SubmissionRef};
pub use http::{create_router, ApiError, AppState, UserIdentity};
pub use intake::{IntakeError, SubmissionForm, SubmissionIntake, UploadedFile};
pub use llm::{GeminiClient, LanguageModel, LlmError};
pub use meeting::{
    Meeting, MeetingStatus, MeetingStore, MemoryStore, PresentationAnalysis, SledStore,
    Submission, SubmissionInfo,
};
pub use ocr::{MistralOcr, OcrError, OcrProvider, OcrResponse};
pub use summarizer::{DocumentSummarizer, DocumentSummary};
