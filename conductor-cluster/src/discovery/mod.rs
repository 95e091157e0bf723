//! Controller discovery: directory/registry lookup, edition-aware filtering,
//! connection probing and result aggregation

pub mod address;
pub mod broadcast;
pub mod directory;
pub mod node_filter;
pub mod registry;
pub mod result;
pub mod service;
pub mod weight;

pub use address::{selector_for, AddressSelector, CloudAddressSelector, PrivateAddressSelector};
pub use broadcast::{BroadcastClient, ProbeError};
pub use directory::{NodeDirectory, StaticNodeDirectory};
pub use node_filter::{NodeFilter, ProbeCandidate, QualifiedNodes};
pub use registry::{ServiceRegistry, StaticServiceRegistry};
pub use result::DiscoveryResultBuilder;
pub use service::DiscoveryService;
pub use weight::{ConnectionWeightResolver, ProbeOutcome};
