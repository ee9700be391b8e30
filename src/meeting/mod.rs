//! Meeting documents and their persistence
//!
//! A meeting embeds its submissions and the per-submission presentation
//! analysis. Two `MeetingStore` backends are provided:
//! - `MemoryStore` - process-local map, used by default and in tests
//! - `SledStore` - JSON documents in an embedded sled database

mod model;
mod sled_store;
mod store;

pub use model::{
    Enrichment, EnrichmentState, Meeting, MeetingStatus, PresentationAnalysis, Submission,
    SubmissionInfo, PLACEHOLDER_IDEA_NAME,
};
pub use sled_store::SledStore;
pub use store::{update_meeting, MeetingStore, MemoryStore, StoreError, StoreResult};
