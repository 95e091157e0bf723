//! Node directory access
//!
//! The directory owns persisted node records; discovery only reads the
//! controller-role subset for one tenant.

use async_trait::async_trait;
use conductor_core::models::ControllerNode;

use crate::error::Result;

/// Read access to persisted controller node records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NodeDirectory: Send + Sync {
    /// Enabled nodes carrying the CONTROLLER role for `tenant_id`, at most `max_count`
    async fn find_controller_nodes(
        &self,
        tenant_id: &str,
        max_count: usize,
    ) -> Result<Vec<ControllerNode>>;
}

/// In-memory directory over a fixed set of node records
#[derive(Debug, Clone, Default)]
pub struct StaticNodeDirectory {
    nodes: Vec<ControllerNode>,
}

impl StaticNodeDirectory {
    #[must_use]
    pub fn new(mut nodes: Vec<ControllerNode>) -> Self {
        // Stable order so the max_count cap always keeps the same nodes
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        Self { nodes }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[async_trait]
impl NodeDirectory for StaticNodeDirectory {
    async fn find_controller_nodes(
        &self,
        tenant_id: &str,
        max_count: usize,
    ) -> Result<Vec<ControllerNode>> {
        Ok(self
            .nodes
            .iter()
            .filter(|n| n.tenant_id == tenant_id && n.enabled && n.is_controller())
            .take(max_count)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_core::models::NodeRole;

    fn directory() -> StaticNodeDirectory {
        StaticNodeDirectory::new(vec![
            ControllerNode::new("c", "acme", "10.0.0.3"),
            ControllerNode::new("a", "acme", "10.0.0.1"),
            ControllerNode::new("b", "acme", "10.0.0.2").disabled(),
            ControllerNode::new("d", "acme", "10.0.0.4").with_roles(vec![NodeRole::Agent]),
            ControllerNode::new("e", "other", "10.0.1.1"),
        ])
    }

    #[tokio::test]
    async fn test_filters_tenant_role_and_enabled() {
        let nodes = directory().find_controller_nodes("acme", 10).await.unwrap();
        let ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_caps_at_max_count() {
        let nodes = directory().find_controller_nodes("acme", 1).await.unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "a");
    }

    #[tokio::test]
    async fn test_unknown_tenant_is_empty() {
        let nodes = directory().find_controller_nodes("nobody", 10).await.unwrap();
        assert!(nodes.is_empty());
    }
}
