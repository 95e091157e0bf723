//! Peer connection probe client
//!
//! Asks a controller instance for its active channel routers over the
//! connection introspection endpoint. The same endpoint serves the local
//! process, so self-probes take the same path as peer probes.

use std::time::Duration;

use conductor_core::models::{ApiEnvelope, ChannelRouterDescriptor};
use conductor_core::DiscoveryConfig;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::error::{Error, Result};

/// Upper bound on a probe response body
const MAX_RESPONSE_SIZE: usize = 4 * 1024 * 1024;

/// Why a single peer probe produced no usable answer
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid probe url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("probe to {url} timed out")]
    Timeout { url: String },

    #[error("probe to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("probe to {url} returned HTTP {status}")]
    Status { status: StatusCode, url: String },

    #[error("probe response from {url} is too large ({size} bytes)")]
    ResponseTooLarge { url: String, size: u64 },

    #[error("probe response from {url} could not be parsed: {reason}")]
    Decode { url: String, reason: String },

    #[error("probe response from {url} has no content (code {code}: {msg})")]
    MissingContent { url: String, code: i32, msg: String },

    #[error("probe to {instance_id} did not finish before the discovery deadline")]
    Unfinished { instance_id: String },
}

impl ProbeError {
    fn from_reqwest(url: &Url, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

/// HTTP client for connection probes
#[derive(Debug, Clone)]
pub struct BroadcastClient {
    client: Client,
    connections_path: String,
}

impl BroadcastClient {
    /// Create a probe client with bounded connect and request timeouts.
    /// Redirects are not followed.
    pub fn new(
        connect_timeout: Duration,
        request_timeout: Duration,
        connections_path: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build probe HTTP client: {e}")))?;

        Ok(Self {
            client,
            connections_path: connections_path.into(),
        })
    }

    pub fn from_config(config: &DiscoveryConfig) -> Result<Self> {
        Self::new(
            config.connect_timeout(),
            config.request_timeout(),
            config.connections_path.clone(),
        )
    }

    /// `http://<instance_id><connections_path>`
    pub fn probe_url(&self, instance_id: &str) -> std::result::Result<Url, ProbeError> {
        let raw = format!("http://{instance_id}{}", self.connections_path);
        Url::parse(&raw).map_err(|e| ProbeError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })
    }

    /// Fetch the active channel routers reported by `instance_id`.
    ///
    /// `auth_token` is sent as a bearer credential when present.
    pub async fn fetch_connections(
        &self,
        instance_id: &str,
        auth_token: Option<&str>,
    ) -> std::result::Result<Vec<ChannelRouterDescriptor>, ProbeError> {
        let url = self.probe_url(instance_id)?;

        let mut request = self.client.get(url.clone());
        if let Some(token) = auth_token.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProbeError::from_reqwest(&url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status {
                status,
                url: url.to_string(),
            });
        }

        if let Some(length) = response.content_length() {
            if length > MAX_RESPONSE_SIZE as u64 {
                return Err(ProbeError::ResponseTooLarge {
                    url: url.to_string(),
                    size: length,
                });
            }
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| ProbeError::from_reqwest(&url, &e))?;
        if body.len() > MAX_RESPONSE_SIZE {
            return Err(ProbeError::ResponseTooLarge {
                url: url.to_string(),
                size: body.len() as u64,
            });
        }

        let envelope: ApiEnvelope<Vec<ChannelRouterDescriptor>> = serde_json::from_slice(&body)
            .map_err(|e| ProbeError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        envelope.content.ok_or_else(|| ProbeError::MissingContent {
            url: url.to_string(),
            code: envelope.code,
            msg: envelope.msg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PATH: &str = "/api/discovery/connections";

    fn client() -> BroadcastClient {
        BroadcastClient::new(Duration::from_millis(200), Duration::from_millis(400), PATH).unwrap()
    }

    fn instance_id(server: &MockServer) -> String {
        server.address().to_string()
    }

    #[test]
    fn test_probe_url() {
        let url = client().probe_url("10.0.0.1:8080").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.1:8080/api/discovery/connections");

        assert!(matches!(
            client().probe_url("bad host:1"),
            Err(ProbeError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_connections_forwards_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .and(header("authorization", "Bearer caller-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "msg": "success",
                "content": [{"channel_id": "c1"}, {"channel_id": "c2"}, {"channel_id": "c3"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let connections = client()
            .fetch_connections(&instance_id(&server), Some("caller-token"))
            .await
            .unwrap();
        assert_eq!(connections.len(), 3);
    }

    #[tokio::test]
    async fn test_no_authorization_header_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200, "msg": "success", "content": []
            })))
            .mount(&server)
            .await;

        let connections = client()
            .fetch_connections(&instance_id(&server), None)
            .await
            .unwrap();
        assert!(connections.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client()
            .fetch_connections(&instance_id(&server), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProbeError::Status { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = client()
            .fetch_connections(&instance_id(&server), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_missing_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 500, "msg": "registry not ready", "content": null
            })))
            .mount(&server)
            .await;

        let err = client()
            .fetch_connections(&instance_id(&server), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::MissingContent { code: 500, .. }));
    }

    #[tokio::test]
    async fn test_slow_peer_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(json!({"code": 200, "msg": "success", "content": []})),
            )
            .mount(&server)
            .await;

        let err = client()
            .fetch_connections(&instance_id(&server), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_peer() {
        // Nothing listens on port 1
        let err = client()
            .fetch_connections("127.0.0.1:1", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProbeError::Transport { .. } | ProbeError::Timeout { .. }
        ));
    }
}
