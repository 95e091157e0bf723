//! Intersects directory nodes with registry-healthy instances

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use conductor_core::models::{ControllerNode, DiscoveryFailure, ServiceInstance};
use conductor_core::Edition;

use super::address::selector_for;
use super::directory::NodeDirectory;
use super::registry::ServiceRegistry;

/// A healthy instance paired with the directory node it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCandidate {
    pub instance: ServiceInstance,
    pub node: ControllerNode,
}

/// Output of the filter stage
#[derive(Debug, Clone)]
pub struct QualifiedNodes {
    /// Every healthy instance, in registry order
    pub instances: Vec<ServiceInstance>,
    /// Qualifying nodes keyed by private ip
    pub nodes_by_ip: HashMap<String, ControllerNode>,
}

impl QualifiedNodes {
    /// Healthy instances whose host maps to a qualifying node
    #[must_use]
    pub fn candidates(&self) -> Vec<ProbeCandidate> {
        self.instances
            .iter()
            .filter_map(|instance| {
                self.nodes_by_ip.get(&instance.host).map(|node| ProbeCandidate {
                    instance: instance.clone(),
                    node: node.clone(),
                })
            })
            .collect()
    }
}

/// Runs the FETCH_NODES, FETCH_INSTANCES and FILTER stages
pub struct NodeFilter {
    directory: Arc<dyn NodeDirectory>,
    registry: Arc<dyn ServiceRegistry>,
    controller_app_id: String,
}

impl NodeFilter {
    #[must_use]
    pub fn new(
        directory: Arc<dyn NodeDirectory>,
        registry: Arc<dyn ServiceRegistry>,
        controller_app_id: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            registry,
            controller_app_id: controller_app_id.into(),
        }
    }

    /// Each stage fails terminally when it yields nothing.
    pub async fn filter(
        &self,
        tenant_id: &str,
        edition: Edition,
        max_nodes: usize,
    ) -> Result<QualifiedNodes, DiscoveryFailure> {
        let nodes = self
            .directory
            .find_controller_nodes(tenant_id, max_nodes)
            .await
            .map_err(|e| DiscoveryFailure::DirectoryUnavailable(e.to_string()))?;
        if nodes.is_empty() {
            return Err(DiscoveryFailure::NoCandidateNodes {
                tenant_id: tenant_id.to_string(),
            });
        }

        let instances = self
            .registry
            .healthy_instances(&self.controller_app_id)
            .await
            .map_err(|e| DiscoveryFailure::RegistryUnavailable(e.to_string()))?;
        if instances.is_empty() {
            return Err(DiscoveryFailure::NoHealthyInstances {
                app_id: self.controller_app_id.clone(),
            });
        }

        let healthy_hosts: HashSet<String> = instances.iter().map(|i| i.host.clone()).collect();
        let selector = selector_for(edition);
        let node_count = nodes.len();

        let mut nodes_by_ip = HashMap::new();
        for node in nodes {
            if let Some(key) = selector.select(&node, &healthy_hosts) {
                nodes_by_ip.insert(key.to_string(), node.clone());
            } else {
                tracing::debug!(
                    node_id = %node.id,
                    ip = %node.ip,
                    %edition,
                    "Controller node not qualified"
                );
            }
        }

        if nodes_by_ip.is_empty() {
            return Err(DiscoveryFailure::NoQualifyingNodes {
                edition: edition.to_string(),
                nodes: node_count,
                instances: instances.len(),
            });
        }

        Ok(QualifiedNodes {
            instances,
            nodes_by_ip,
        })
    }
}
