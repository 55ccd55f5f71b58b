use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;
use crate::storage::UPLOADS_PREFIX;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>, body_limit: usize) -> Router {
    let uploads = ServeDir::new(&state.upload_dir);

    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Accounts
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/profile", get(handlers::profile))

        // Images
        .route("/api/images/upload", post(handlers::upload_image))
        .route("/api/images", get(handlers::list_images))
        .route("/api/images/{id}", get(handlers::get_image))

        // Change analyses
        .route("/api/analysis", post(handlers::create_analysis).get(handlers::list_analyses))
        .route("/api/analysis/{id}", get(handlers::get_analysis))
        .route("/api/analysis/{id}/geojson", get(handlers::get_analysis_geojson))

        // Real-time notifications
        .route("/ws", get(handlers::ws_handler))

        // Uploaded files
        .nest_service(UPLOADS_PREFIX, uploads)

        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
