//! Health check endpoint.

use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;

use crate::AppState;
use crate::routes::success;

/// Health check handler.
async fn health_check() -> impl IntoResponse {
    success(
        StatusCode::OK,
        json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
