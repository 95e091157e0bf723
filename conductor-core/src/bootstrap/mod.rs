//! Startup helpers

mod config;

pub use config::load_config;
