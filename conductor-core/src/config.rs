use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::{ControllerNode, ServiceInstance};

/// Fixed HTTP routes; the connections endpoint must not collide with them
pub const HEALTH_ROUTE: &str = "/health";
pub const DISCOVERY_ROUTE: &str = "/api/discovery/controllers";
pub const CHANNELS_ROUTE: &str = "/api/channels";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub discovery: DiscoveryConfig,
    pub directory: DirectoryConfig,
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            http_port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

/// Deployment edition. Changes which tenant owns the controller fleet and
/// which node addresses are reachable by clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    /// Multi-tenant hosted deployment; controllers belong to the owner tenant
    Cloud,
    /// Single-tenant deployment; controllers belong to the caller's tenant
    #[default]
    Private,
}

impl std::fmt::Display for Edition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cloud => f.write_str("cloud"),
            Self::Private => f.write_str("private"),
        }
    }
}

/// Controller discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub edition: Edition,
    /// Application id the controllers register under in the service registry
    pub controller_app_id: String,
    /// Port clients use to reach a controller; appended to every discovery host
    pub controller_port: u16,
    /// Path of the connection introspection endpoint probed on every peer
    pub connections_path: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_controller_nodes: usize,
    /// Owner tenant for the cloud edition, fallback tenant for the private edition
    pub owner_tenant_id: String,
    pub max_concurrent_probes: usize,
    /// Upper bound for one whole discovery call, probes included
    pub discovery_deadline_ms: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            edition: Edition::Private,
            controller_app_id: "conductor-controller".to_string(),
            controller_port: 9090,
            connections_path: "/api/discovery/connections".to_string(),
            connect_timeout_ms: 300,
            request_timeout_ms: 800,
            max_controller_nodes: 100,
            owner_tenant_id: "default".to_string(),
            max_concurrent_probes: 50,
            discovery_deadline_ms: 3000,
        }
    }
}

impl DiscoveryConfig {
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub const fn deadline(&self) -> Duration {
        Duration::from_millis(self.discovery_deadline_ms)
    }

    fn validate(&self, errors: &mut Vec<String>) {
        if self.controller_app_id.trim().is_empty() {
            errors.push("discovery.controller_app_id must not be empty".to_string());
        }
        if self.controller_port == 0 {
            errors.push("discovery.controller_port must be greater than 0".to_string());
        }
        let path = self.connections_path.as_str();
        if !path.starts_with('/') {
            errors.push(format!(
                "discovery.connections_path must start with '/', got '{path}'"
            ));
        }
        if path.contains(|c: char| matches!(c, '{' | '}' | '*')) {
            errors.push(format!(
                "discovery.connections_path must be a literal path, got '{path}'"
            ));
        }
        let channels_prefix = format!("{CHANNELS_ROUTE}/");
        if [HEALTH_ROUTE, DISCOVERY_ROUTE, CHANNELS_ROUTE].contains(&path)
            || path.starts_with(&channels_prefix)
        {
            errors.push(format!(
                "discovery.connections_path '{path}' collides with a built-in route"
            ));
        }
        if self.connect_timeout_ms == 0 {
            errors.push("discovery.connect_timeout_ms must be greater than 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            errors.push("discovery.request_timeout_ms must be greater than 0".to_string());
        }
        if self.request_timeout_ms < self.connect_timeout_ms {
            errors.push(format!(
                "discovery.request_timeout_ms ({}) must not be shorter than connect_timeout_ms ({})",
                self.request_timeout_ms, self.connect_timeout_ms
            ));
        }
        if self.discovery_deadline_ms < self.request_timeout_ms {
            errors.push(format!(
                "discovery.discovery_deadline_ms ({}) must not be shorter than request_timeout_ms ({})",
                self.discovery_deadline_ms, self.request_timeout_ms
            ));
        }
        if self.max_controller_nodes == 0 {
            errors.push("discovery.max_controller_nodes must be greater than 0".to_string());
        }
        if self.max_concurrent_probes == 0 {
            errors.push("discovery.max_concurrent_probes must be greater than 0".to_string());
        } else {
            // Probes run in waves of max_concurrent_probes; every wave must fit the deadline
            let waves = self.max_controller_nodes.div_ceil(self.max_concurrent_probes) as u64;
            let needed_ms = waves.saturating_mul(self.request_timeout_ms);
            if self.discovery_deadline_ms < needed_ms {
                errors.push(format!(
                    "discovery.discovery_deadline_ms ({}) is shorter than {waves} probe wave(s) of \
                     request_timeout_ms ({}); raise the deadline or max_concurrent_probes",
                    self.discovery_deadline_ms, self.request_timeout_ms
                ));
            }
        }
        if self.owner_tenant_id.trim().is_empty() {
            errors.push("discovery.owner_tenant_id must not be empty".to_string());
        }
    }
}

/// Controller node records served by the in-process node directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub nodes: Vec<ControllerNode>,
}

/// One healthy instance as listed in the static registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub app_id: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub instance_id: Option<String>,
}

impl RegistryEntry {
    #[must_use]
    pub fn to_instance(&self) -> ServiceInstance {
        let instance = ServiceInstance::new(self.host.clone(), self.port);
        match &self.instance_id {
            Some(id) => instance.with_instance_id(id.clone()),
            None => instance,
        }
    }
}

/// Healthy instances served by the in-process service registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub instances: Vec<RegistryEntry>,
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // CONDUCTOR__DISCOVERY__CONTROLLER_PORT=9090 etc.
        builder = builder.add_source(
            Environment::with_prefix("CONDUCTOR")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Check the configuration, collecting every violation
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.http_port == 0 {
            errors.push("server.http_port must be greater than 0".to_string());
        }
        self.discovery.validate(&mut errors);

        for entry in &self.registry.instances {
            if entry.host.trim().is_empty() {
                errors.push(format!("registry instance for '{}' has an empty host", entry.app_id));
            }
        }
        for node in &self.directory.nodes {
            if node.ip.trim().is_empty() {
                errors.push(format!("directory node '{}' has an empty ip", node.id));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.http_port)
    }
}
