//! Router construction

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};
use crate::config::ServerConfig;

/// Build the application router
///
/// - `POST /api/summarize` with the upload size limit applied
/// - `GET /health`
/// - `GET /metrics`
/// - anything else is served from `static_dir`
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .route("/api/summarize", post(handlers::summarize))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .merge(api_routes)
        .fallback_service(ServeDir::new(&server.static_dir))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
