pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::filler::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(health::service_info_handler))
        .route("/health", get(health::health_handler))
        .route("/fill-cv/", post(handlers::handle_fill_from_files))
        .route("/fill-cv-from-data/", post(handlers::handle_fill_from_data))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
