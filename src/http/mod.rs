//! HTTP API for the judging workflow
//!
//! - GET /health - Health check
//! - POST /meetings, GET /meetings?userId= - Create / list meetings
//! - GET|PUT|DELETE /meetings/:id - Fetch, partially update, delete
//! - POST /submissions - Multipart team submission (teamName, meetingId, pdf)
//! - POST /parse - Multipart document → OCR + summary
//! - POST /analyze - Transcript → pros/cons/questions for a submission
//! - POST /evaluate - Score and rank all submissions of a meeting

mod error;
mod extract;
mod handlers;
mod identity;
mod routes;
mod state;

pub use error::{ApiError, ApiResult};
pub use extract::{ApiJson, ApiMultipart};
pub use identity::{UserIdentity, USER_ID_HEADER};
pub use routes::{create_router, MAX_UPLOAD_BYTES};
pub use state::AppState;
