//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::analyze::{analyze_reel, analyze_upload, analyze_youtube};
use crate::handlers::health::health;
use crate::handlers::videos::{delete_video, get_video};
use crate::middleware::cors_layer;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let max_body_size = state.config.max_body_size;

    Router::new()
        .route("/health", get(health))
        .route("/analyze-video", post(analyze_upload))
        .route("/analyze-video/reel", post(analyze_reel))
        .route("/analyze-video/youtube", post(analyze_youtube))
        .route("/videos/:filename", get(get_video).delete(delete_video))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
