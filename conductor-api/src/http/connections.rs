//! Channel registration and connection introspection
//!
//! Peers probe `GET <connections_path>` during discovery and count the
//! descriptors in the envelope's `content`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use conductor_cluster::ConnectionObserver;
use conductor_core::config::CHANNELS_ROUTE;
use conductor_core::models::{ApiEnvelope, ChannelRouterDescriptor};
use serde::Deserialize;

use super::{AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterChannelRequest {
    pub channel_id: String,
    pub client_id: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

pub fn create_connections_router(connections_path: &str) -> Router<AppState> {
    Router::new()
        .route(connections_path, get(list_connections))
        .route(CHANNELS_ROUTE, post(register_channel))
        .route(&format!("{CHANNELS_ROUTE}/{{channel_id}}"), delete(unregister_channel))
}

/// Active channels on this node, wrapped in the peer envelope
pub async fn list_connections(
    State(state): State<AppState>,
) -> Json<ApiEnvelope<Vec<ChannelRouterDescriptor>>> {
    Json(ApiEnvelope::success(state.connections.list_active()))
}

pub async fn register_channel(
    State(state): State<AppState>,
    Json(req): Json<RegisterChannelRequest>,
) -> AppResult<(StatusCode, Json<ChannelRouterDescriptor>)> {
    let mut descriptor = ChannelRouterDescriptor::new(req.channel_id, req.client_id);
    descriptor.tenant_id = req.tenant_id.filter(|t| !t.trim().is_empty());

    state.connections.register(descriptor.clone())?;
    Ok((StatusCode::CREATED, Json(descriptor)))
}

pub async fn unregister_channel(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<Json<ChannelRouterDescriptor>> {
    let descriptor = state.connections.unregister(&channel_id)?;
    Ok(Json(descriptor))
}
