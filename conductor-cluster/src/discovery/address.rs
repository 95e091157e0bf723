//! Edition-aware address selection
//!
//! Decides whether a directory node is reachable given the set of hosts the
//! registry reports healthy. A selected node is indexed by its private ip,
//! which is what registry instances report as their host.

use std::collections::HashSet;

use conductor_core::models::ControllerNode;
use conductor_core::Edition;

/// Strategy deciding if a node qualifies for discovery
pub trait AddressSelector: Send + Sync {
    /// Returns the lookup key (private ip) when `node` qualifies
    fn select<'a>(
        &self,
        node: &'a ControllerNode,
        healthy_hosts: &HashSet<String>,
    ) -> Option<&'a str>;
}

/// Cloud edition: clients reach controllers from outside the private network
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudAddressSelector;

impl AddressSelector for CloudAddressSelector {
    fn select<'a>(
        &self,
        node: &'a ControllerNode,
        healthy_hosts: &HashSet<String>,
    ) -> Option<&'a str> {
        if node.public_ip().is_some() {
            return Some(node.ip.as_str());
        }
        if node.domain().is_some() && healthy_hosts.contains(node.ip.as_str()) {
            return Some(node.ip.as_str());
        }
        None
    }
}

/// Private edition: only the private address matters
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivateAddressSelector;

impl AddressSelector for PrivateAddressSelector {
    fn select<'a>(
        &self,
        node: &'a ControllerNode,
        healthy_hosts: &HashSet<String>,
    ) -> Option<&'a str> {
        healthy_hosts
            .contains(node.ip.as_str())
            .then_some(node.ip.as_str())
    }
}

/// Selector for a deployment edition
#[must_use]
pub fn selector_for(edition: Edition) -> &'static dyn AddressSelector {
    match edition {
        Edition::Cloud => &CloudAddressSelector,
        Edition::Private => &PrivateAddressSelector,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy(hosts: &[&str]) -> HashSet<String> {
        hosts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_private_requires_healthy_ip() {
        let hosts = healthy(&["10.0.0.5"]);
        let selector = PrivateAddressSelector;

        let node = ControllerNode::new("n5", "t", "10.0.0.5");
        assert_eq!(selector.select(&node, &hosts), Some("10.0.0.5"));

        let node = ControllerNode::new("n9", "t", "10.0.0.9");
        assert_eq!(selector.select(&node, &hosts), None);
    }

    #[test]
    fn test_private_ignores_public_ip() {
        let hosts = healthy(&["10.0.0.5"]);
        let node = ControllerNode::new("n9", "t", "10.0.0.9").with_public_ip("203.0.113.9");
        assert_eq!(PrivateAddressSelector.select(&node, &hosts), None);
    }

    #[test]
    fn test_cloud_public_ip_always_qualifies() {
        let hosts = healthy(&[]);
        let node = ControllerNode::new("n1", "t", "10.0.0.1").with_public_ip("203.0.113.1");
        assert_eq!(CloudAddressSelector.select(&node, &hosts), Some("10.0.0.1"));
    }

    #[test]
    fn test_cloud_domain_needs_healthy_ip() {
        let node = ControllerNode::new("n1", "t", "10.0.0.1").with_domain("ctrl.example.com");
        assert_eq!(CloudAddressSelector.select(&node, &healthy(&["10.0.0.1"])), Some("10.0.0.1"));
        assert_eq!(CloudAddressSelector.select(&node, &healthy(&["10.0.0.2"])), None);
    }

    #[test]
    fn test_cloud_bare_private_ip_never_qualifies() {
        let node = ControllerNode::new("n1", "t", "10.0.0.1");
        assert_eq!(CloudAddressSelector.select(&node, &healthy(&["10.0.0.1"])), None);
    }

    #[test]
    fn test_selector_table() {
        let node = ControllerNode::new("n1", "t", "10.0.0.1");
        let hosts = healthy(&["10.0.0.1"]);
        assert!(selector_for(Edition::Private).select(&node, &hosts).is_some());
        assert!(selector_for(Edition::Cloud).select(&node, &hosts).is_none());
    }
}
