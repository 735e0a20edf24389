//! Dynamic routing engines that fill the protocol route tables.
//!
//! # Neighbour index
//!
//! Each refresh bulk-loads the current node positions into an R-tree
//! (`rstar`) and asks it for every node within [`LinkModel::max_range`] of
//! each node; the link model then confirms each candidate.  Neighbour lists
//! are sorted by id so breadth-first search visits nodes in a fixed order.

use std::collections::VecDeque;
use std::time::Duration;

use rstar::RTree;
use rstar::primitives::GeomWithData;
use tracing::trace;

use mn_core::{NodeId, Position, RoutingProtocol, SimTime};
use mn_routing::{ProtocolRoutes, RouteEntry, RouteTable, RouteTableHandle};

use crate::LinkModel;

/// A protocol instance spanning every node of the run.
pub trait RoutingEngine {
    /// Which protocol the tables belong to.
    fn protocol(&self) -> RoutingProtocol;

    /// Create the routing source for `node`.  Called once per node, in id
    /// order, before the run starts.
    fn attach(&mut self, node: NodeId) -> ProtocolRoutes;

    /// Recompute routes from the topology at `now`.  `positions` is indexed
    /// by node id.
    fn refresh(&mut self, now: SimTime, positions: &[Position], link: &dyn LinkModel);
}

/// Stand-in engine with perfect, instantaneous topology knowledge.
///
/// Every refresh replaces each node's table with min-hop routes over the
/// current connectivity graph.  Entries carry `route_lifetime` so a node
/// whose engine stops refreshing loses its routes instead of keeping stale
/// ones.  Unreachable destinations have no entry.
#[derive(Debug)]
pub struct ShortestPathOracle {
    protocol:       RoutingProtocol,
    route_lifetime: Duration,
    tables:         Vec<RouteTableHandle>,
    refreshes:      u64,
}

type Located = GeomWithData<[f64; 2], u32>;

impl ShortestPathOracle {
    pub fn new(protocol: RoutingProtocol, route_lifetime: Duration) -> Self {
        Self { protocol, route_lifetime, tables: Vec::new(), refreshes: 0 }
    }

    #[inline]
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// Sorted neighbour lists of every node at the given positions.
    pub fn neighbours(positions: &[Position], link: &dyn LinkModel) -> Vec<Vec<u32>> {
        let points: Vec<Located> = positions
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new([p.x, p.y], i as u32))
            .collect();
        let tree = RTree::bulk_load(points);
        let radius = link.max_range();

        positions
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let mut adj: Vec<u32> = tree
                    .locate_within_distance([p.x, p.y], radius * radius)
                    .map(|g| g.data)
                    .filter(|&j| j as usize != i && link.can_reach(p, positions[j as usize]))
                    .collect();
                adj.sort_unstable();
                adj
            })
            .collect()
    }
}

/// First hop and hop count from `src` to every node, by BFS.
fn first_hops(src: usize, adjacency: &[Vec<u32>]) -> Vec<Option<(u32, u32)>> {
    let mut best: Vec<Option<(u32, u32)>> = vec![None; adjacency.len()];
    let mut queue = VecDeque::new();
    for &n in &adjacency[src] {
        best[n as usize] = Some((n, 1));
        queue.push_back(n);
    }
    while let Some(u) = queue.pop_front() {
        let Some((hop, dist)) = best[u as usize] else { continue };
        for &v in &adjacency[u as usize] {
            if v as usize != src && best[v as usize].is_none() {
                best[v as usize] = Some((hop, dist + 1));
                queue.push_back(v);
            }
        }
    }
    best
}

impl RoutingEngine for ShortestPathOracle {
    fn protocol(&self) -> RoutingProtocol {
        self.protocol
    }

    fn attach(&mut self, node: NodeId) -> ProtocolRoutes {
        debug_assert_eq!(node.index(), self.tables.len(), "nodes attach in id order");
        let (routes, handle) = ProtocolRoutes::new(self.protocol);
        self.tables.push(handle);
        routes
    }

    fn refresh(&mut self, now: SimTime, positions: &[Position], link: &dyn LinkModel) {
        let adjacency = Self::neighbours(positions, link);
        let expires = Some(now + self.route_lifetime);

        for (src, handle) in self.tables.iter().enumerate().take(adjacency.len()) {
            let mut table = RouteTable::new();
            for (dst, hop) in first_hops(src, &adjacency).into_iter().enumerate() {
                if let Some((next, dist)) = hop {
                    table.insert(NodeId(dst as u32), RouteEntry::new(NodeId(next), dist), expires);
                }
            }
            handle.replace(table);
        }
        self.refreshes += 1;
        trace!(%now, protocol = %self.protocol, "routing tables refreshed");
    }
}
