// HTTP server module

pub mod connections;
pub mod discovery;
pub mod error;
pub mod health;
pub mod middleware;

use std::sync::Arc;

use axum::Router;
use conductor_cluster::{DiscoveryService, LocalConnectionRegistry};
use tower_http::trace::TraceLayer;

pub use error::{AppError, AppResult};
pub use middleware::BearerToken;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<DiscoveryService>,
    pub connections: LocalConnectionRegistry,
}

impl AppState {
    #[must_use]
    pub const fn new(
        discovery: Arc<DiscoveryService>,
        connections: LocalConnectionRegistry,
    ) -> Self {
        Self {
            discovery,
            connections,
        }
    }
}

/// Create the HTTP router
///
/// `connections_path` is the route peers probe for this node's channel list;
/// it must match the path used when probing so that nodes can discover each
/// other, and must not collide with the fixed routes (`DiscoveryConfig`
/// validation rejects such paths).
pub fn create_router(state: AppState, connections_path: &str) -> Router {
    let router = Router::new()
        .merge(health::create_health_router())
        .merge(discovery::create_discovery_router())
        .merge(connections::create_connections_router(connections_path))
        .layer(TraceLayer::new_for_http());

    router.with_state(state)
}
