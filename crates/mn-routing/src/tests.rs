//! Unit tests for mn-routing.

use mn_core::{NodeId, RoutingProtocol, SimTime, SourceId};

use crate::{
    NoRouteFound, ProtocolRoutes, RouteEntry, RouteTable, RoutingResolver, RoutingSource,
    StaticRoutes,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const D: NodeId = NodeId(9);

fn t(secs: u64) -> SimTime {
    SimTime::from_secs(secs)
}

/// A source that always offers the same route to `D`.
struct Fixed {
    name: &'static str,
    via:  NodeId,
}

impl RoutingSource for Fixed {
    fn name(&self) -> &str {
        self.name
    }

    fn contribution_for(&self, destination: NodeId, _now: SimTime) -> Option<RouteEntry> {
        (destination == D).then_some(RouteEntry::new(self.via, 1))
    }
}

// ── Priority resolution ───────────────────────────────────────────────────────

#[cfg(test)]
mod priority {
    use super::*;

    #[test]
    fn higher_priority_wins_then_falls_back() {
        let mut resolver = RoutingResolver::new(NodeId(0));

        let mut a = StaticRoutes::new();
        a.add_host_route(D, NodeId(1), 1);
        let a_id = resolver.install(0, a);

        let (b, b_table) = ProtocolRoutes::new(RoutingProtocol::Aodv);
        let b_id = resolver.install(60, b);
        b_table.update(|tbl| tbl.insert(D, RouteEntry::new(NodeId(2), 3), None));

        for _ in 0..3 {
            let d = resolver.resolve(D, t(1)).unwrap();
            assert_eq!(d.next_hop, NodeId(2));
            assert_eq!(d.source, b_id);
            assert_eq!(d.priority, 60);
        }

        b_table.update(|tbl| tbl.remove(D));
        let d = resolver.resolve(D, t(2)).unwrap();
        assert_eq!(d.next_hop, NodeId(1));
        assert_eq!(d.source, a_id);
    }

    #[test]
    fn install_order_does_not_matter_across_priorities() {
        let mut resolver = RoutingResolver::new(NodeId(0));
        resolver.install(60, Fixed { name: "hi", via: NodeId(2) });
        resolver.install(0, Fixed { name: "lo", via: NodeId(1) });
        assert_eq!(resolver.resolve(D, t(0)).unwrap().next_hop, NodeId(2));
    }

    #[test]
    fn equal_priority_first_installed_wins() {
        let mut resolver = RoutingResolver::new(NodeId(0));
        let first = resolver.install(10, Fixed { name: "first", via: NodeId(1) });
        resolver.install(10, Fixed { name: "second", via: NodeId(2) });
        let d = resolver.resolve(D, t(0)).unwrap();
        assert_eq!(d.source, first);
        assert_eq!(d.next_hop, NodeId(1));
    }

    #[test]
    fn many_sources_resolution_order() {
        let mut resolver = RoutingResolver::new(NodeId(0));
        resolver.install(5, Fixed { name: "a", via: NodeId(1) });
        resolver.install(50, Fixed { name: "b", via: NodeId(2) });
        resolver.install(20, Fixed { name: "c", via: NodeId(3) });
        resolver.install(50, Fixed { name: "d", via: NodeId(4) });
        let names: Vec<_> = resolver.sources().map(|(_, _, n)| n.to_owned()).collect();
        assert_eq!(names, ["b", "d", "c", "a"]);
        assert_eq!(resolver.source_name(SourceId(2)), Some("c"));
    }

    #[test]
    fn expired_entry_falls_back() {
        let mut resolver = RoutingResolver::new(NodeId(0));
        resolver.install(0, Fixed { name: "static", via: NodeId(1) });
        let (dynamic, table) = ProtocolRoutes::new(RoutingProtocol::Olsr);
        resolver.install(60, dynamic);
        table.update(|tbl| tbl.insert(D, RouteEntry::new(NodeId(5), 2), Some(t(10))));

        assert_eq!(resolver.resolve(D, t(9)).unwrap().next_hop, NodeId(5));
        assert_eq!(resolver.resolve(D, t(10)).unwrap().next_hop, NodeId(1));
    }
}

// ── No route ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod no_route {
    use super::*;

    #[test]
    fn empty_sources_report_no_route() {
        let mut resolver = RoutingResolver::new(NodeId(3));
        resolver.install(0, StaticRoutes::new());
        let (dynamic, _table) = ProtocolRoutes::new(RoutingProtocol::Dsdv);
        resolver.install(60, dynamic);
        assert_eq!(
            resolver.resolve(D, t(4)),
            Err(NoRouteFound { node: NodeId(3), destination: D, at: t(4) })
        );
    }

    #[test]
    fn no_stale_decision_after_withdrawal() {
        let mut resolver = RoutingResolver::new(NodeId(0));
        let (dynamic, table) = ProtocolRoutes::new(RoutingProtocol::Aodv);
        resolver.install(60, dynamic);
        table.update(|tbl| tbl.insert(D, RouteEntry::new(NodeId(1), 1), None));
        assert!(resolver.resolve(D, t(0)).is_ok());
        table.replace(RouteTable::new());
        assert!(resolver.resolve(D, t(0)).is_err());
    }

    #[test]
    fn no_sources_at_all() {
        let resolver = RoutingResolver::new(NodeId(0));
        assert!(resolver.is_empty());
        assert!(resolver.resolve(D, t(0)).is_err());
    }
}

// ── Sources ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sources {
    use super::*;

    #[test]
    fn static_default_route() {
        let mut s = StaticRoutes::new();
        assert!(s.is_empty());
        s.set_default_route(NodeId(7), 1).add_host_route(D, NodeId(2), 1);
        assert_eq!(s.contribution_for(D, t(0)), Some(RouteEntry::new(NodeId(2), 1)));
        assert_eq!(s.contribution_for(NodeId(4), t(0)), Some(RouteEntry::new(NodeId(7), 1)));
        s.remove_host_route(D);
        assert_eq!(s.contribution_for(D, t(0)).map(|r| r.next_hop), Some(NodeId(7)));
    }

    #[test]
    fn protocol_source_is_named_after_protocol() {
        let (olsr, _) = ProtocolRoutes::new(RoutingProtocol::Olsr);
        assert_eq!(olsr.name(), "OLSR");
        assert_eq!(olsr.protocol(), RoutingProtocol::Olsr);
    }

    #[test]
    fn purge_expired() {
        let mut tbl = RouteTable::new();
        tbl.insert(NodeId(1), RouteEntry::new(NodeId(1), 1), Some(t(5)));
        tbl.insert(NodeId(2), RouteEntry::new(NodeId(2), 1), None);
        assert_eq!(tbl.purge_expired(t(5)), 1);
        assert_eq!(tbl.len(), 1);
        assert!(tbl.lookup(NodeId(2), t(1_000)).is_some());
    }
}
