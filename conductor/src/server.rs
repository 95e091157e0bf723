//! Server lifecycle
//!
//! Binds the HTTP listener, serves until SIGINT/SIGTERM, then drains
//! in-flight requests.

use std::sync::Arc;

use conductor_api::{create_router, AppState};
use conductor_cluster::{ConnectionObserver, DiscoveryService, LocalConnectionRegistry};
use conductor_core::Config;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub struct ConductorServer {
    config: Config,
    discovery: Arc<DiscoveryService>,
    connections: LocalConnectionRegistry,
}

impl ConductorServer {
    pub const fn new(
        config: Config,
        discovery: Arc<DiscoveryService>,
        connections: LocalConnectionRegistry,
    ) -> Self {
        Self {
            config,
            discovery,
            connections,
        }
    }

    /// Start the HTTP server and wait for a shutdown signal
    pub async fn start(&self) -> anyhow::Result<()> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let listener = tokio::net::TcpListener::bind(self.config.http_address())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind {}: {e}", self.config.http_address()))?;
        info!("HTTP server listening on {}", listener.local_addr()?);

        let mut http_handle = self.start_http_server(listener, shutdown_rx);

        tokio::select! {
            _ = &mut http_handle => {
                error!("HTTP server stopped unexpectedly");
                return Err(anyhow::anyhow!("HTTP server stopped unexpectedly"));
            }
            () = shutdown_signal() => {
                info!("Shutdown signal received, starting graceful shutdown...");
            }
        }

        let _ = shutdown_tx.send(true);
        if let Err(e) = http_handle.await {
            error!("HTTP server task failed: {}", e);
        }

        info!(
            active_channels = self.connections.active_count(),
            total_channels = self.connections.total_registered(),
            "Server shut down"
        );
        Ok(())
    }

    fn start_http_server(
        &self,
        listener: tokio::net::TcpListener,
        shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let state = AppState::new(self.discovery.clone(), self.connections.clone());
        let router = create_router(state, &self.config.discovery.connections_path);

        tokio::spawn(async move {
            let mut rx = shutdown_rx;
            let graceful = async move {
                let _ = rx.changed().await;
            };

            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(graceful)
                .await
            {
                error!("HTTP server error: {}", e);
            }

            info!("HTTP server shut down gracefully");
        })
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT/Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("Received Ctrl+C"); }
        () = terminate => { info!("Received SIGTERM"); }
    }
}
