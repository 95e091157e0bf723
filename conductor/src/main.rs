mod server;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use conductor_cluster::{
    DiscoveryService, LocalConnectionRegistry, StaticNodeDirectory, StaticServiceRegistry,
};
use conductor_core::{bootstrap::load_config, logging};

use server::ConductorServer;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load and validate configuration
    let config = load_config()?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("Conductor starting...");
    info!("HTTP address: {}", config.http_address());
    info!(
        edition = %config.discovery.edition,
        app_id = %config.discovery.controller_app_id,
        "Discovery configured"
    );

    // 3. Discovery collaborators
    let directory = StaticNodeDirectory::new(config.directory.nodes.clone());
    let registry = StaticServiceRegistry::from_entries(&config.registry.instances);
    info!(
        nodes = directory.len(),
        instances = config.registry.instances.len(),
        "Loaded static directory and registry"
    );

    let discovery = DiscoveryService::new(
        Arc::new(directory),
        Arc::new(registry),
        config.discovery.clone(),
    )?;

    // 4. Run the server until a shutdown signal arrives
    let server = ConductorServer::new(config, Arc::new(discovery), LocalConnectionRegistry::new());
    server.start().await?;

    info!("Conductor stopped");
    Ok(())
}
