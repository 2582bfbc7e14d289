pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::handle_analyze;
use crate::pdf::{handle_parse_resume, MAX_PDF_BYTES};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze", post(handle_analyze))
        .route("/api/parse-resume", post(handle_parse_resume))
        // Leave headroom above the PDF cap for multipart framing.
        .layer(DefaultBodyLimit::max(MAX_PDF_BYTES + 64 * 1024))
        .with_state(state)
}
