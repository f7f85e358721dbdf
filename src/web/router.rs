//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    connect_telegram, delete_file, disconnect_telegram, download_file, get_current_user, get_file,
    list_files, storage_usage, upload_file, AppState,
};
use super::middleware::create_cors_layer;
use crate::quota::MAX_FILE_SIZE;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/auth/user", get(get_current_user))
        .route("/files", get(list_files))
        .route("/files/upload", post(upload_file))
        .route("/files/:id", get(get_file).delete(delete_file))
        .route("/files/:id/download", get(download_file))
        .route("/storage/usage", get(storage_usage))
        .route("/telegram/connect", post(connect_telegram))
        .route("/telegram/disconnect", post(disconnect_telegram));

    Router::new()
        .nest("/api", api_routes)
        // Raise axum's default body limit to the per-file ceiling
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE as usize))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
        // Should not panic
    }
}
