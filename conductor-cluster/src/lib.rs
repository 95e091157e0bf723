pub mod connections;
pub mod discovery;
pub mod error;

pub use connections::{ConnectionObserver, LocalConnectionRegistry};
pub use discovery::{
    AddressSelector, BroadcastClient, ConnectionWeightResolver, DiscoveryResultBuilder,
    DiscoveryService, NodeDirectory, NodeFilter, ProbeError, ServiceRegistry, StaticNodeDirectory,
    StaticServiceRegistry,
};
pub use error::{Error, Result};
