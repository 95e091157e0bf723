// Module: connections

pub mod registry;

pub use registry::{ConnectionObserver, LocalConnectionRegistry};
