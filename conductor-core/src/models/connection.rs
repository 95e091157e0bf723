use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Describes one active client channel routed through a controller.
///
/// Discovery only counts these; every field defaults so descriptors from
/// peers running other builds still parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelRouterDescriptor {
    pub channel_id: String,
    pub client_id: String,
    pub tenant_id: Option<String>,
    pub connected_at: Option<DateTime<Utc>>,
}

impl ChannelRouterDescriptor {
    #[must_use]
    pub fn new(channel_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            client_id: client_id.into(),
            tenant_id: None,
            connected_at: Some(Utc::now()),
        }
    }

    #[must_use]
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }
}
