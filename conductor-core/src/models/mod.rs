pub mod connection;
pub mod discovery;
pub mod envelope;
pub mod node;

pub use connection::ChannelRouterDescriptor;
pub use discovery::{
    DiscoveryFailure, DiscoveryNode, DiscoveryRequest, DiscoveryResponse, DiscoveryResult,
};
pub use envelope::ApiEnvelope;
pub use node::{ControllerNode, NodeRole, ServiceInstance};
