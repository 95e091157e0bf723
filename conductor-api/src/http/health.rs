//! Health check endpoints

use axum::{response::IntoResponse, routing::get, Router};
use conductor_core::config::HEALTH_ROUTE;

use crate::http::AppState;

/// Health check router
pub fn create_health_router() -> Router<AppState> {
    Router::new().route(HEALTH_ROUTE, get(health_check))
}

/// Always OK while the server is accepting requests
pub async fn health_check() -> impl IntoResponse {
    "OK"
}
