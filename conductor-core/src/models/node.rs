use serde::{Deserialize, Serialize};

/// Role a node plays in the execution fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeRole {
    Controller,
    Agent,
}

/// A node record as persisted by the node directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerNode {
    pub id: String,
    pub tenant_id: String,
    /// Private address, matched against registry instance hosts
    pub ip: String,
    #[serde(default)]
    pub public_ip: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub roles: Vec<NodeRole>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl ControllerNode {
    #[must_use]
    pub fn new(id: impl Into<String>, tenant_id: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tenant_id: tenant_id.into(),
            ip: ip.into(),
            public_ip: None,
            domain: None,
            roles: vec![NodeRole::Controller],
            enabled: true,
        }
    }

    #[must_use]
    pub fn with_public_ip(mut self, public_ip: impl Into<String>) -> Self {
        self.public_ip = Some(public_ip.into());
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn with_roles(mut self, roles: Vec<NodeRole>) -> Self {
        self.roles = roles;
        self
    }

    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    #[must_use]
    pub fn is_controller(&self) -> bool {
        self.roles.contains(&NodeRole::Controller)
    }

    /// Public address, ignoring blank values
    #[must_use]
    pub fn public_ip(&self) -> Option<&str> {
        non_blank(self.public_ip.as_deref())
    }

    /// Domain name, ignoring blank values
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        non_blank(self.domain.as_deref())
    }

    /// Address clients should dial: domain, then public ip, then private ip
    #[must_use]
    pub fn client_address(&self) -> &str {
        self.domain()
            .or_else(|| self.public_ip())
            .unwrap_or(&self.ip)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// A healthy instance as reported by the service registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    pub host: String,
    pub port: u16,
    /// Self-reported identifier, used as the authority of probe URLs
    #[serde(default)]
    pub instance_id: Option<String>,
}

impl ServiceInstance {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            instance_id: None,
        }
    }

    #[must_use]
    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    /// Reported instance id, or `host:port` when the registry did not report one
    #[must_use]
    pub fn instance_id(&self) -> String {
        match non_blank(self.instance_id.as_deref()) {
            Some(id) => id.to_string(),
            None => format!("{}:{}", self.host, self.port),
        }
    }
}
