mod judging;
mod meetings;
mod submissions;

pub use judging::{analyze_presentation, evaluate_submissions};
pub use meetings::{
    create_meeting, delete_meeting, get_meeting, list_meetings, update_meeting_fields,
};
pub use submissions::{create_submission, parse_document};

use axum::{http::StatusCode, response::IntoResponse};

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
