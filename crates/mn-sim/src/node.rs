//! Simulated network nodes.

use std::net::Ipv4Addr;

use mn_core::{NodeId, Position, SimTime};
use mn_mobility::MobilityTrace;
use mn_routing::RoutingResolver;

/// Which half of the population a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Random waypoint mover; may host a sink.
    Mobile,
    /// Fixed grid position; may host a source.
    Stationary,
}

/// One node: identity, address, motion, and forwarding authority.
#[derive(Debug)]
pub struct Node {
    id:       NodeId,
    address:  Ipv4Addr,
    role:     NodeRole,
    trace:    MobilityTrace,
    resolver: RoutingResolver,
}

impl Node {
    pub(crate) fn new(
        id:       NodeId,
        address:  Ipv4Addr,
        role:     NodeRole,
        trace:    MobilityTrace,
        resolver: RoutingResolver,
    ) -> Self {
        Self { id, address, role, trace, resolver }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    #[inline]
    pub fn role(&self) -> NodeRole {
        self.role
    }

    #[inline]
    pub fn trace(&self) -> &MobilityTrace {
        &self.trace
    }

    #[inline]
    pub fn resolver(&self) -> &RoutingResolver {
        &self.resolver
    }

    #[inline]
    pub fn position_at(&self, now: SimTime) -> Position {
        self.trace.position_at(now)
    }
}
