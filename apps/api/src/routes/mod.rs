pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::ingest::handlers as ingest_handlers;
use crate::quiz::handlers as quiz_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_max_bytes = state.config.upload_max_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume ingestion
        .route(
            "/api/v1/resume",
            post(ingest_handlers::handle_upload_resume).get(ingest_handlers::handle_get_profile),
        )
        .route(
            "/api/v1/resume/text",
            get(ingest_handlers::handle_get_resume_text),
        )
        // Quiz attempts
        .route("/api/v1/quiz/roles", get(quiz_handlers::handle_list_roles))
        .route(
            "/api/v1/quiz/attempts",
            post(quiz_handlers::handle_start_attempt),
        )
        .route(
            "/api/v1/quiz/attempts/:id/answer",
            post(quiz_handlers::handle_submit_answer),
        )
        .route(
            "/api/v1/quiz/attempts/:id",
            delete(quiz_handlers::handle_cancel_attempt),
        )
        .route(
            "/api/v1/quiz/results",
            get(quiz_handlers::handle_list_results),
        )
        .layer(DefaultBodyLimit::max(upload_max_bytes))
        .with_state(state)
}
