pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis_handlers;
use crate::ingest::handlers as ingest_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resumes",
            post(ingest_handlers::handle_upload).get(ingest_handlers::handle_list),
        )
        .route(
            "/api/v1/resumes/:id",
            get(ingest_handlers::handle_get_resume),
        )
        .route("/api/v1/evaluate", post(analysis_handlers::handle_evaluate))
        .route("/api/v1/analyze", post(analysis_handlers::handle_analyze))
        .with_state(state)
}
