use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use conductor_core::models::ChannelRouterDescriptor;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Read-only view of the channels routed through this process
pub trait ConnectionObserver: Send + Sync {
    fn list_active(&self) -> Vec<ChannelRouterDescriptor>;

    fn active_count(&self) -> usize {
        self.list_active().len()
    }
}

/// Per-process registry of active channel routers
#[derive(Clone, Default)]
pub struct LocalConnectionRegistry {
    /// Active channels by `channel_id`
    channels: Arc<DashMap<String, ChannelRouterDescriptor>>,

    /// Channels registered since startup
    total_registered: Arc<AtomicU64>,
}

impl LocalConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel; rejects a `channel_id` that is already active
    pub fn register(&self, descriptor: ChannelRouterDescriptor) -> Result<()> {
        if descriptor.channel_id.trim().is_empty() {
            return Err(Error::InvalidInput("channel_id must not be empty".to_string()));
        }

        match self.channels.entry(descriptor.channel_id.clone()) {
            Entry::Occupied(_) => Err(Error::AlreadyExists(format!(
                "channel {} is already registered",
                descriptor.channel_id
            ))),
            Entry::Vacant(entry) => {
                info!(
                    channel_id = %descriptor.channel_id,
                    client_id = %descriptor.client_id,
                    "Channel registered"
                );
                entry.insert(descriptor);
                self.total_registered.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        }
    }

    /// Remove a channel, returning its descriptor
    pub fn unregister(&self, channel_id: &str) -> Result<ChannelRouterDescriptor> {
        let (_, descriptor) = self
            .channels
            .remove(channel_id)
            .ok_or_else(|| Error::NotFound(format!("channel {channel_id} is not registered")))?;

        debug!(channel_id = %channel_id, "Channel unregistered");
        Ok(descriptor)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn total_registered(&self) -> u64 {
        self.total_registered.load(Ordering::Relaxed)
    }
}

impl ConnectionObserver for LocalConnectionRegistry {
    /// Snapshot ordered by connect time, then channel id
    fn list_active(&self) -> Vec<ChannelRouterDescriptor> {
        let mut active: Vec<_> = self.channels.iter().map(|e| e.value().clone()).collect();
        active.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.channel_id.cmp(&b.channel_id))
        });
        active
    }

    fn active_count(&self) -> usize {
        self.count()
    }
}
