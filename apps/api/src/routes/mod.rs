pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::assessment::handlers;
use crate::errors::AppError;
use crate::state::AppState;

/// Headroom on top of the resume size for the other multipart fields.
const UPLOAD_FORM_OVERHEAD: usize = 256 * 1024;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_resume_bytes + UPLOAD_FORM_OVERHEAD;

    Router::new()
        .route("/health", get(health::health_handler))
        // Assessment API
        .route("/api/v1/fields", get(handlers::handle_list_fields))
        .route("/api/v1/scans", post(handlers::handle_create_scan))
        .route(
            "/api/v1/scans/upload",
            post(handlers::handle_upload_scan).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .fallback(not_found)
        .with_state(state)
}
