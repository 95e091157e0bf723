//! Error types for cluster module

use thiserror::Error;

/// Cluster error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type for cluster operations
pub type Result<T> = std::result::Result<T, Error>;
