//! End-to-end discovery against mock controller peers
//!
//! Run with: cargo test -p conductor-cluster --test discovery_pipeline

use std::collections::HashSet;
use std::sync::Arc;

use conductor_cluster::{DiscoveryService, StaticNodeDirectory, StaticServiceRegistry};
use conductor_core::models::{ControllerNode, DiscoveryRequest, DiscoveryResponse, ServiceInstance};
use conductor_core::{DiscoveryConfig, Edition};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PATH: &str = "/api/discovery/connections";
const CONTROLLER_PORT: u16 = 9090;

fn discovery_config(edition: Edition) -> DiscoveryConfig {
    DiscoveryConfig {
        edition,
        controller_app_id: "conductor-controller".to_string(),
        controller_port: CONTROLLER_PORT,
        connections_path: PATH.to_string(),
        owner_tenant_id: "owner".to_string(),
        connect_timeout_ms: 200,
        request_timeout_ms: 500,
        discovery_deadline_ms: 2000,
        ..DiscoveryConfig::default()
    }
}

/// Mock peer reporting `connections` active channels to callers presenting `token`
async fn peer(connections: usize, token: &str) -> MockServer {
    let server = MockServer::start().await;
    let content: Vec<_> = (0..connections)
        .map(|i| json!({"channel_id": format!("ch-{i}"), "client_id": "client"}))
        .collect();
    Mock::given(method("GET"))
        .and(path(PATH))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "msg": "success",
            "content": content
        })))
        .expect(1..)
        .mount(&server)
        .await;
    server
}

fn service(
    nodes: Vec<ControllerNode>,
    instances: Vec<ServiceInstance>,
    edition: Edition,
) -> DiscoveryService {
    let registry = StaticServiceRegistry::new().with_instances("conductor-controller", instances);
    DiscoveryService::new(
        Arc::new(StaticNodeDirectory::new(nodes)),
        Arc::new(registry),
        discovery_config(edition),
    )
    .expect("discovery service")
}

#[tokio::test]
async fn test_weighted_discovery_end_to_end() {
    let peer_a = peer(0, "caller-token").await;
    let peer_b = peer(3, "caller-token").await;

    let service = service(
        vec![
            ControllerNode::new("A", "acme", "10.0.0.1"),
            ControllerNode::new("B", "acme", "10.0.0.2").with_domain("ctrl.b.com"),
        ],
        vec![
            ServiceInstance::new("10.0.0.1", 8080).with_instance_id(peer_a.address().to_string()),
            ServiceInstance::new("10.0.0.2", 8080).with_instance_id(peer_b.address().to_string()),
        ],
        Edition::Private,
    );

    let request = DiscoveryRequest::new()
        .with_tenant_id("acme")
        .with_auth_token("caller-token");
    let result = service.discover(&request).await;

    assert!(!result.is_failed());
    let nodes = result.nodes();
    assert_eq!(nodes.len(), 2);

    let a = nodes.iter().find(|n| n.host == "10.0.0.1:9090").expect("node A");
    assert!((a.weight - 1.0).abs() < f64::EPSILON);

    let b = nodes.iter().find(|n| n.host == "ctrl.b.com:9090").expect("node B");
    assert!((b.weight - 1.0 / 3.0).abs() < 1e-9);

    let response = DiscoveryResponse::from(result);
    assert!(!response.failed);
    assert!(response.failure_message.is_none());
}

#[tokio::test]
async fn test_exactly_one_of_failed_or_nodes() {
    let peer_a = peer(1, "t").await;
    let scenarios = vec![
        (vec![], vec![ServiceInstance::new("10.0.0.1", 8080)]),
        (vec![ControllerNode::new("A", "acme", "10.0.0.1")], vec![]),
        (
            vec![ControllerNode::new("A", "acme", "10.0.0.9")],
            vec![ServiceInstance::new("10.0.0.1", 8080)],
        ),
        (
            vec![ControllerNode::new("A", "acme", "10.0.0.1")],
            vec![ServiceInstance::new("10.0.0.1", 8080).with_instance_id(peer_a.address().to_string())],
        ),
    ];

    for (nodes, instances) in scenarios {
        let result = service(nodes, instances, Edition::Private)
            .discover(&DiscoveryRequest::new().with_tenant_id("acme").with_auth_token("t"))
            .await;
        let response = DiscoveryResponse::from(result);
        let has_nodes = response.nodes.as_ref().is_some_and(|n| !n.is_empty());
        assert!(response.failed ^ has_nodes);
        assert_eq!(response.failed, response.failure_message.is_some());
    }
}

#[tokio::test]
async fn test_cloud_edition_prefers_public_addresses() {
    let peer_a = peer(2, "t").await;
    let peer_b = peer(0, "t").await;

    let service = service(
        vec![
            ControllerNode::new("A", "owner", "10.0.0.1").with_public_ip("203.0.113.1"),
            ControllerNode::new("B", "owner", "10.0.0.2").with_domain("ctrl.b.com"),
            // No public address: not reachable from outside in the cloud edition
            ControllerNode::new("C", "owner", "10.0.0.3"),
        ],
        vec![
            ServiceInstance::new("10.0.0.1", 8080).with_instance_id(peer_a.address().to_string()),
            ServiceInstance::new("10.0.0.2", 8080).with_instance_id(peer_b.address().to_string()),
            ServiceInstance::new("10.0.0.3", 8080),
        ],
        Edition::Cloud,
    );

    let result = service
        .discover(&DiscoveryRequest::new().with_tenant_id("someone-else").with_auth_token("t"))
        .await;
    let hosts: HashSet<_> = result.nodes().iter().map(|n| n.host.as_str()).collect();
    assert_eq!(hosts, HashSet::from(["203.0.113.1:9090", "ctrl.b.com:9090"]));
}
