use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body (proposal PDFs)
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Meetings
        .route(
            "/meetings",
            post(handlers::create_meeting).get(handlers::list_meetings),
        )
        .route(
            "/meetings/:id",
            get(handlers::get_meeting)
                .put(handlers::update_meeting_fields)
                .delete(handlers::delete_meeting),
        )
        // Submissions and document parsing
        .route("/submissions", post(handlers::create_submission))
        .route("/parse", post(handlers::parse_document))
        // Judging
        .route("/analyze", post(handlers::analyze_presentation))
        .route("/presentations/analyze", post(handlers::analyze_presentation))
        .route("/evaluate", post(handlers::evaluate_submissions))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
