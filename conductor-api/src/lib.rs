//! HTTP surface for conductor
//!
//! Serves controller discovery to clients and this node's active channels to
//! peer controllers.

pub mod http;

pub use http::{create_router, AppError, AppResult, AppState};
