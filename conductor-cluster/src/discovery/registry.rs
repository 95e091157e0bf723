//! Service registry access

use std::collections::HashMap;

use async_trait::async_trait;
use conductor_core::config::RegistryEntry;
use conductor_core::models::ServiceInstance;

use crate::error::Result;

/// Source of currently healthy service instances
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    async fn healthy_instances(&self, app_id: &str) -> Result<Vec<ServiceInstance>>;
}

/// Registry over a fixed instance list, grouped by application id
#[derive(Debug, Clone, Default)]
pub struct StaticServiceRegistry {
    instances: HashMap<String, Vec<ServiceInstance>>,
}

impl StaticServiceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_entries(entries: &[RegistryEntry]) -> Self {
        let mut registry = Self::new();
        for entry in entries {
            registry
                .instances
                .entry(entry.app_id.clone())
                .or_default()
                .push(entry.to_instance());
        }
        registry
    }

    #[must_use]
    pub fn with_instances(
        mut self,
        app_id: impl Into<String>,
        instances: Vec<ServiceInstance>,
    ) -> Self {
        self.instances.insert(app_id.into(), instances);
        self
    }
}

#[async_trait]
impl ServiceRegistry for StaticServiceRegistry {
    async fn healthy_instances(&self, app_id: &str) -> Result<Vec<ServiceInstance>> {
        Ok(self.instances.get(app_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_groups_entries_by_app_id() {
        let entries = vec![
            RegistryEntry {
                app_id: "controller".to_string(),
                host: "10.0.0.1".to_string(),
                port: 8080,
                instance_id: None,
            },
            RegistryEntry {
                app_id: "controller".to_string(),
                host: "10.0.0.2".to_string(),
                port: 8080,
                instance_id: Some("ctrl-2:8080".to_string()),
            },
            RegistryEntry {
                app_id: "agent".to_string(),
                host: "10.0.9.1".to_string(),
                port: 7000,
                instance_id: None,
            },
        ];
        let registry = StaticServiceRegistry::from_entries(&entries);

        let controllers = registry.healthy_instances("controller").await.unwrap();
        assert_eq!(controllers.len(), 2);
        assert_eq!(controllers[1].instance_id(), "ctrl-2:8080");
        assert!(registry.healthy_instances("missing").await.unwrap().is_empty());
    }
}
