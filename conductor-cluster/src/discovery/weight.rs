//! Converts probed connection counts into discovery weights
//!
//! Every candidate is probed independently; the fan-out is bounded by
//! `max_concurrent` and each probe is bounded by the client's timeouts.
//! Probes still running at the discovery deadline are abandoned and reported
//! as failed, so answers already received are kept.

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use tokio::time::{sleep_until, Instant};

use conductor_core::models::DiscoveryNode;

use super::broadcast::{BroadcastClient, ProbeError};
use super::node_filter::ProbeCandidate;

/// Result of probing one candidate
#[derive(Debug)]
pub struct ProbeOutcome {
    pub node_id: String,
    pub instance_id: String,
    pub result: Result<DiscoveryNode, ProbeError>,
}

pub struct ConnectionWeightResolver {
    client: BroadcastClient,
    controller_port: u16,
    max_concurrent: usize,
}

impl ConnectionWeightResolver {
    #[must_use]
    pub fn new(client: BroadcastClient, controller_port: u16, max_concurrent: usize) -> Self {
        Self {
            client,
            controller_port,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Probe all candidates until `deadline`. Outcomes keep the candidate
    /// order; a candidate without an answer by then gets `ProbeError::Unfinished`.
    pub async fn resolve(
        &self,
        candidates: &[ProbeCandidate],
        auth_token: Option<&str>,
        deadline: Instant,
    ) -> Vec<ProbeOutcome> {
        let probes: Vec<_> = candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| {
                async move { (index, self.resolve_one(candidate, auth_token).await) }.boxed()
            })
            .collect();
        let finished: Vec<(usize, ProbeOutcome)> = stream::iter(probes)
            .buffer_unordered(self.max_concurrent)
            .take_until(sleep_until(deadline))
            .collect()
            .await;

        let mut slots: Vec<Option<ProbeOutcome>> = candidates.iter().map(|_| None).collect();
        for (index, outcome) in finished {
            slots[index] = Some(outcome);
        }

        slots
            .into_iter()
            .zip(candidates)
            .map(|(slot, candidate)| slot.unwrap_or_else(|| Self::unfinished(candidate)))
            .collect()
    }

    fn unfinished(candidate: &ProbeCandidate) -> ProbeOutcome {
        let instance_id = candidate.instance.instance_id();
        ProbeOutcome {
            node_id: candidate.node.id.clone(),
            result: Err(ProbeError::Unfinished {
                instance_id: instance_id.clone(),
            }),
            instance_id,
        }
    }

    async fn resolve_one(
        &self,
        candidate: &ProbeCandidate,
        auth_token: Option<&str>,
    ) -> ProbeOutcome {
        let instance_id = candidate.instance.instance_id();
        let result = self
            .client
            .fetch_connections(&instance_id, auth_token)
            .await
            .map(|connections| {
                tracing::trace!(
                    node_id = %candidate.node.id,
                    instance_id = %instance_id,
                    connections = connections.len(),
                    "Probed controller"
                );
                DiscoveryNode::new(
                    self.discovery_host(candidate),
                    DiscoveryNode::weight_for(connections.len()),
                )
            });

        ProbeOutcome {
            node_id: candidate.node.id.clone(),
            instance_id,
            result,
        }
    }

    /// Client-facing address of the candidate plus the controller port
    #[must_use]
    pub fn discovery_host(&self, candidate: &ProbeCandidate) -> String {
        format!("{}:{}", candidate.node.client_address(), self.controller_port)
    }
}
