//! Aggregates probe outcomes into a discovery result

use conductor_core::models::{DiscoveryNode, DiscoveryResult};

use super::weight::ProbeOutcome;

/// Collects successful probes and drops failed ones
#[derive(Debug, Default)]
pub struct DiscoveryResultBuilder {
    nodes: Vec<DiscoveryNode>,
    attempted: usize,
}

impl DiscoveryResultBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome; failures are logged with candidate context and excluded
    pub fn record(&mut self, outcome: ProbeOutcome) {
        self.attempted += 1;
        match outcome.result {
            Ok(node) => self.nodes.push(node),
            Err(e) => {
                tracing::warn!(
                    node_id = %outcome.node_id,
                    instance_id = %outcome.instance_id,
                    error = %e,
                    "Connection probe failed, excluding controller"
                );
            }
        }
    }

    #[must_use]
    pub fn with_outcomes(mut self, outcomes: impl IntoIterator<Item = ProbeOutcome>) -> Self {
        for outcome in outcomes {
            self.record(outcome);
        }
        self
    }

    #[must_use]
    pub fn build(self) -> DiscoveryResult {
        DiscoveryResult::from_nodes(self.nodes, self.attempted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::broadcast::ProbeError;
    use conductor_core::models::DiscoveryFailure;

    fn ok(node_id: &str, host: &str, weight: f64) -> ProbeOutcome {
        ProbeOutcome {
            node_id: node_id.to_string(),
            instance_id: format!("{node_id}:8080"),
            result: Ok(DiscoveryNode::new(host, weight)),
        }
    }

    fn failed(node_id: &str) -> ProbeOutcome {
        ProbeOutcome {
            node_id: node_id.to_string(),
            instance_id: format!("{node_id}:8080"),
            result: Err(ProbeError::Timeout {
                url: format!("http://{node_id}:8080/api/discovery/connections"),
            }),
        }
    }

    #[test]
    fn test_partial_failure_keeps_successes() {
        let result = DiscoveryResultBuilder::new()
            .with_outcomes([failed("a"), ok("b", "10.0.0.2:9090", 0.5)])
            .build();
        assert!(!result.is_failed());
        assert_eq!(result.nodes(), &[DiscoveryNode::new("10.0.0.2:9090", 0.5)]);
    }

    #[test]
    fn test_all_failed() {
        let result = DiscoveryResultBuilder::new()
            .with_outcomes([failed("a"), failed("b")])
            .build();
        assert_eq!(
            result.failure(),
            Some(&DiscoveryFailure::NoReachableCandidates { attempted: 2 })
        );
    }

    #[test]
    fn test_no_outcomes() {
        let result = DiscoveryResultBuilder::new().build();
        assert!(result.is_failed());
    }
}
