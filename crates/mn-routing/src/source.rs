//! The routing-source capability.

use mn_core::{NodeId, SimTime};

/// One proposed forwarding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub next_hop: NodeId,
    /// Source-specific cost (hops, ETX, …).  Only meaningful within the
    /// source that produced it.
    pub metric:   u32,
}

impl RouteEntry {
    #[inline]
    pub const fn new(next_hop: NodeId, metric: u32) -> Self {
        Self { next_hop, metric }
    }
}

/// Anything that can propose a next hop: a static table or one routing
/// protocol instance.
///
/// Implement this to plug a protocol into [`RoutingResolver`][crate::RoutingResolver].
/// Contributions may change between calls as the protocol learns, but a
/// single call must not mutate the source.
///
/// # Threading
///
/// Sources live inside a single-threaded event loop and may hold
/// `Rc`-shared state, so the trait carries no `Send`/`Sync` bound.
pub trait RoutingSource {
    /// Short label for logs ("static", "AODV", …).
    fn name(&self) -> &str;

    /// The route this source offers toward `destination` at `now`, if any.
    fn contribution_for(&self, destination: NodeId, now: SimTime) -> Option<RouteEntry>;
}
