//! Manually configured routes.

use std::collections::HashMap;

use mn_core::{NodeId, SimTime};

use crate::{RouteEntry, RoutingSource};

/// Host routes plus an optional default route.  Never expire.
///
/// An empty `StaticRoutes` contributes nothing, which is the usual
/// configuration for the low-priority fallback slot.
#[derive(Debug, Clone, Default)]
pub struct StaticRoutes {
    hosts:   HashMap<NodeId, RouteEntry>,
    default: Option<RouteEntry>,
}

impl StaticRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route traffic for `destination` via `next_hop`.  Replaces any
    /// existing host route for that destination.
    pub fn add_host_route(&mut self, destination: NodeId, next_hop: NodeId, metric: u32) -> &mut Self {
        self.hosts.insert(destination, RouteEntry::new(next_hop, metric));
        self
    }

    pub fn remove_host_route(&mut self, destination: NodeId) -> Option<RouteEntry> {
        self.hosts.remove(&destination)
    }

    /// Route everything without a host route via `next_hop`.
    pub fn set_default_route(&mut self, next_hop: NodeId, metric: u32) -> &mut Self {
        self.default = Some(RouteEntry::new(next_hop, metric));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && self.default.is_none()
    }
}

impl RoutingSource for StaticRoutes {
    fn name(&self) -> &str {
        "static"
    }

    fn contribution_for(&self, destination: NodeId, _now: SimTime) -> Option<RouteEntry> {
        self.hosts.get(&destination).copied().or(self.default)
    }
}
