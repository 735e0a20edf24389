use mn_core::{NodeId, SimTime};
use thiserror::Error;

/// No installed source had a valid contribution for the destination.
///
/// This is an expected outcome, not a fault.  The forwarding layer decides
/// what happens to the packet (drop, queue, notify); the resolver never
/// retries or falls back to a stale decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no route from {node} to {destination} at t={at}")]
pub struct NoRouteFound {
    pub node:        NodeId,
    pub destination: NodeId,
    pub at:          SimTime,
}
