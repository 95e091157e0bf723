//! Discovery request/result types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inbound discovery request
#[derive(Debug, Clone, Default)]
pub struct DiscoveryRequest {
    /// Caller tenant; scopes the directory lookup in the private edition
    pub tenant_id: Option<String>,
    /// Bearer token of the caller, forwarded on every peer probe
    pub auth_token: Option<String>,
}

impl DiscoveryRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// A reachable controller together with its load weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryNode {
    /// `address:port` clients should connect to
    pub host: String,
    /// In (0, 1]; higher means less loaded
    pub weight: f64,
}

impl DiscoveryNode {
    #[must_use]
    pub fn new(host: impl Into<String>, weight: f64) -> Self {
        Self {
            host: host.into(),
            weight,
        }
    }

    /// Weight for a controller reporting `active_connections` channels.
    #[must_use]
    pub fn weight_for(active_connections: usize) -> f64 {
        if active_connections == 0 {
            1.0
        } else {
            1.0 / active_connections as f64
        }
    }
}

/// Terminal discovery failures. Messages are meant for operators, not end users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryFailure {
    #[error("no controller nodes found for tenant '{tenant_id}'")]
    NoCandidateNodes { tenant_id: String },

    #[error("no healthy instances registered for application '{app_id}'")]
    NoHealthyInstances { app_id: String },

    #[error("no controller node matched a healthy instance ({edition} edition, {nodes} node(s), {instances} instance(s))")]
    NoQualifyingNodes {
        edition: String,
        nodes: usize,
        instances: usize,
    },

    #[error("none of {attempted} candidate controller(s) answered the connection probe")]
    NoReachableCandidates { attempted: usize },

    #[error("node directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("service registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("discovery did not finish within {deadline_ms}ms")]
    DeadlineExceeded { deadline_ms: u64 },
}

impl DiscoveryFailure {
    /// Stable identifier for logs and alerts
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NoCandidateNodes { .. } => "no_candidate_nodes",
            Self::NoHealthyInstances { .. } => "no_healthy_instances",
            Self::NoQualifyingNodes { .. } => "no_qualifying_nodes",
            Self::NoReachableCandidates { .. } => "no_reachable_candidates",
            Self::DirectoryUnavailable(_) => "directory_unavailable",
            Self::RegistryUnavailable(_) => "registry_unavailable",
            Self::DeadlineExceeded { .. } => "deadline_exceeded",
        }
    }
}

/// Outcome of one discovery call: a failure or a non-empty node list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "DiscoveryResponse")]
pub enum DiscoveryResult {
    Failed(DiscoveryFailure),
    Found(Vec<DiscoveryNode>),
}

impl DiscoveryResult {
    /// Builds a result from weighted nodes; an empty list becomes
    /// `NoReachableCandidates` so the node list is never empty.
    #[must_use]
    pub fn from_nodes(nodes: Vec<DiscoveryNode>, attempted: usize) -> Self {
        if nodes.is_empty() {
            Self::Failed(DiscoveryFailure::NoReachableCandidates { attempted })
        } else {
            Self::Found(nodes)
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&DiscoveryFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Found(_) => None,
        }
    }

    /// Discovered nodes; empty when the call failed
    #[must_use]
    pub fn nodes(&self) -> &[DiscoveryNode] {
        match self {
            Self::Failed(_) => &[],
            Self::Found(nodes) => nodes,
        }
    }
}

impl From<DiscoveryFailure> for DiscoveryResult {
    fn from(failure: DiscoveryFailure) -> Self {
        Self::Failed(failure)
    }
}

/// JSON shape of a discovery result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResponse {
    pub failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<DiscoveryNode>>,
}

impl From<DiscoveryResult> for DiscoveryResponse {
    fn from(result: DiscoveryResult) -> Self {
        match result {
            DiscoveryResult::Failed(failure) => Self {
                failed: true,
                failure_message: Some(failure.to_string()),
                nodes: None,
            },
            DiscoveryResult::Found(nodes) => Self {
                failed: false,
                failure_message: None,
                nodes: Some(nodes),
            },
        }
    }
}
