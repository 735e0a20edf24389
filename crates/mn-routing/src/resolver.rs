//! Priority-ordered composition of routing sources.

use mn_core::{NodeId, SimTime, SourceId};

use crate::{NoRouteFound, RoutingSource};

/// The single next hop chosen for one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardingDecision {
    pub next_hop: NodeId,
    pub metric:   u32,
    /// Which installed source produced the route.
    pub source:   SourceId,
    pub priority: u16,
}

struct Installed {
    id:       SourceId,
    priority: u16,
    source:   Box<dyn RoutingSource>,
}

/// Per-node forwarding authority over an ordered list of routing sources.
///
/// `sources` is kept sorted by descending priority; among equal priorities
/// the earlier installation comes first.  Nothing is cached: every
/// [`resolve`][Self::resolve] re-queries the sources.
pub struct RoutingResolver {
    node:    NodeId,
    sources: Vec<Installed>,
}

impl RoutingResolver {
    pub fn new(node: NodeId) -> Self {
        Self { node, sources: Vec::new() }
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Add `source` at `priority`.  Returns the id later decisions carry.
    ///
    /// # Panics
    /// Panics if more than `u16::MAX - 1` sources are installed on one node.
    pub fn install<S: RoutingSource + 'static>(&mut self, priority: u16, source: S) -> SourceId {
        let id = SourceId::try_from(self.sources.len())
            .ok()
            .filter(|id| *id != SourceId::INVALID)
            .expect("too many routing sources on one node");
        // Insert after every source of equal or higher priority.
        let at = self.sources.partition_point(|s| s.priority >= priority);
        self.sources.insert(at, Installed { id, priority, source: Box::new(source) });
        id
    }

    /// Pick the next hop toward `destination` at `now`.
    pub fn resolve(&self, destination: NodeId, now: SimTime) -> Result<ForwardingDecision, NoRouteFound> {
        self.sources
            .iter()
            .find_map(|s| {
                s.source.contribution_for(destination, now).map(|route| ForwardingDecision {
                    next_hop: route.next_hop,
                    metric:   route.metric,
                    source:   s.id,
                    priority: s.priority,
                })
            })
            .ok_or(NoRouteFound { node: self.node, destination, at: now })
    }

    /// Installed sources in resolution order: `(id, priority, name)`.
    pub fn sources(&self) -> impl Iterator<Item = (SourceId, u16, &str)> + '_ {
        self.sources.iter().map(|s| (s.id, s.priority, s.source.name()))
    }

    pub fn source_name(&self, id: SourceId) -> Option<&str> {
        self.sources.iter().find(|s| s.id == id).map(|s| s.source.name())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for RoutingResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingResolver")
            .field("node", &self.node)
            .field("sources", &self.sources().collect::<Vec<_>>())
            .finish()
    }
}
