//! Controller discovery endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use conductor_core::config::DISCOVERY_ROUTE;
use conductor_core::models::{DiscoveryRequest, DiscoveryResponse};
use serde::Deserialize;

use super::{AppState, BearerToken};

#[derive(Debug, Default, Deserialize)]
pub struct DiscoveryQuery {
    pub tenant_id: Option<String>,
}

pub fn create_discovery_router() -> Router<AppState> {
    Router::new().route(DISCOVERY_ROUTE, get(discover_controllers))
}

/// Discover controllers for the caller
///
/// Always answers 200; a failed discovery is reported in the body with
/// `failed: true` and a `failureMessage`.
pub async fn discover_controllers(
    State(state): State<AppState>,
    token: BearerToken,
    Query(query): Query<DiscoveryQuery>,
) -> Json<DiscoveryResponse> {
    let mut request = DiscoveryRequest::new();
    request.tenant_id = query.tenant_id;
    request.auth_token = token.0;

    let result = state.discovery.discover(&request).await;
    Json(result.into())
}
