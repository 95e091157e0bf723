//! Controller discovery entry point
//!
//! Runs FETCH_NODES → FETCH_INSTANCES → FILTER → PROBE → BUILD_RESULT for one
//! request. Calls share no mutable state; every failure comes back as a
//! failed `DiscoveryResult`.
//!
//! The deadline cuts the directory and registry lookups outright, but only
//! abandons the probes still in flight when it fires.

use std::sync::Arc;

use tokio::time::Instant;

use conductor_core::models::{DiscoveryFailure, DiscoveryRequest, DiscoveryResult};
use conductor_core::{DiscoveryConfig, Edition};

use super::broadcast::BroadcastClient;
use super::directory::NodeDirectory;
use super::node_filter::NodeFilter;
use super::registry::ServiceRegistry;
use super::result::DiscoveryResultBuilder;
use super::weight::ConnectionWeightResolver;
use crate::error::Result;

pub struct DiscoveryService {
    filter: NodeFilter,
    resolver: ConnectionWeightResolver,
    config: DiscoveryConfig,
}

impl DiscoveryService {
    pub fn new(
        directory: Arc<dyn NodeDirectory>,
        registry: Arc<dyn ServiceRegistry>,
        config: DiscoveryConfig,
    ) -> Result<Self> {
        let client = BroadcastClient::from_config(&config)?;
        let resolver = ConnectionWeightResolver::new(
            client,
            config.controller_port,
            config.max_concurrent_probes,
        );
        let filter = NodeFilter::new(directory, registry, config.controller_app_id.clone());

        Ok(Self {
            filter,
            resolver,
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Tenant whose controllers serve this request
    #[must_use]
    pub fn tenant_scope<'a>(&'a self, request: &'a DiscoveryRequest) -> &'a str {
        match self.config.edition {
            Edition::Cloud => self.config.owner_tenant_id.as_str(),
            Edition::Private => request
                .tenant_id
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(self.config.owner_tenant_id.as_str()),
        }
    }

    /// Discover reachable controllers, bounded by the configured deadline
    pub async fn discover(&self, request: &DiscoveryRequest) -> DiscoveryResult {
        let deadline = Instant::now() + self.config.deadline();
        let result = self.run(request, deadline).await;

        match &result {
            DiscoveryResult::Failed(failure) => tracing::warn!(
                tenant_id = %self.tenant_scope(request),
                kind = failure.kind(),
                "Controller discovery failed: {failure}"
            ),
            DiscoveryResult::Found(nodes) => tracing::debug!(
                tenant_id = %self.tenant_scope(request),
                nodes = nodes.len(),
                "Controller discovery succeeded"
            ),
        }

        result
    }

    async fn run(&self, request: &DiscoveryRequest, deadline: Instant) -> DiscoveryResult {
        let tenant_id = self.tenant_scope(request);

        let lookup = self
            .filter
            .filter(tenant_id, self.config.edition, self.config.max_controller_nodes);
        let qualified = match tokio::time::timeout_at(deadline, lookup).await {
            Ok(Ok(qualified)) => qualified,
            Ok(Err(failure)) => return failure.into(),
            Err(_) => {
                return DiscoveryFailure::DeadlineExceeded {
                    deadline_ms: self.config.discovery_deadline_ms,
                }
                .into()
            }
        };

        let candidates = qualified.candidates();
        let outcomes = self
            .resolver
            .resolve(&candidates, request.auth_token.as_deref(), deadline)
            .await;

        DiscoveryResultBuilder::new().with_outcomes(outcomes).build()
    }
}
