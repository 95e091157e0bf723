//! Error type returned by HTTP handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// A status code plus a client-safe message
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status: self.status.as_u16(),
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Client errors keep their message; backend failures are logged and masked
impl From<conductor_cluster::Error> for AppError {
    fn from(err: conductor_cluster::Error) -> Self {
        use conductor_cluster::Error;

        match err {
            Error::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            Error::AlreadyExists(msg) => Self::new(StatusCode::CONFLICT, msg),
            Error::InvalidInput(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            other => {
                tracing::error!(error = %other, "Cluster error while handling request");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
