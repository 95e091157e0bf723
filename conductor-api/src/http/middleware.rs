//! Request extractors

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};

use super::AppError;

/// Bearer token presented by the caller, if any
///
/// Discovery forwards it to peer controllers so each peer authorizes the
/// original caller. A missing or non-bearer header yields `None`; a header
/// that is not valid ASCII is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BearerToken(pub Option<String>);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Self(None));
        };

        let auth_str = value
            .to_str()
            .map_err(|e| {
                AppError::new(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid Authorization header: {e}"),
                )
            })?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string);

        Ok(Self(token))
    }
}
