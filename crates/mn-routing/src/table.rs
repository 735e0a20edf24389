//! Route tables written by protocol engines and read by resolvers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use mn_core::{NodeId, RoutingProtocol, SimTime};

use crate::{RouteEntry, RoutingSource};

// ── RouteTable ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
struct TableEntry {
    route:      RouteEntry,
    /// Exclusive validity bound; `None` never expires.
    expires_at: Option<SimTime>,
}

/// Destination → route map with optional per-entry lifetimes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: HashMap<NodeId, TableEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the route toward `destination`.
    pub fn insert(
        &mut self,
        destination: NodeId,
        route:       RouteEntry,
        expires_at:  Option<SimTime>,
    ) {
        self.entries.insert(destination, TableEntry { route, expires_at });
    }

    pub fn remove(&mut self, destination: NodeId) -> Option<RouteEntry> {
        self.entries.remove(&destination).map(|e| e.route)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The route toward `destination` if one exists and has not expired.
    pub fn lookup(&self, destination: NodeId, now: SimTime) -> Option<RouteEntry> {
        self.entries
            .get(&destination)
            .filter(|e| e.expires_at.is_none_or(|t| now < t))
            .map(|e| e.route)
    }

    /// Drop every entry expired at `now`.  Returns how many were removed.
    pub fn purge_expired(&mut self, now: SimTime) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.expires_at.is_none_or(|t| now < t));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── RouteTableHandle ──────────────────────────────────────────────────────────

/// Write access to a [`ProtocolRoutes`] table, held by the protocol engine.
///
/// Shares the table through `Rc<RefCell<_>>`: the event loop is
/// single-threaded, and engine updates and resolver lookups run in separate
/// callbacks, so a borrow is never held across the two.
#[derive(Debug, Clone)]
pub struct RouteTableHandle(Rc<RefCell<RouteTable>>);

impl RouteTableHandle {
    /// Mutate the table in place.
    pub fn update<R>(&self, f: impl FnOnce(&mut RouteTable) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// Swap in a freshly computed table.
    pub fn replace(&self, table: RouteTable) {
        *self.0.borrow_mut() = table;
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

// ── ProtocolRoutes ────────────────────────────────────────────────────────────

/// The routing source of one dynamic protocol instance.
#[derive(Debug)]
pub struct ProtocolRoutes {
    protocol: RoutingProtocol,
    table:    Rc<RefCell<RouteTable>>,
}

impl ProtocolRoutes {
    /// An empty table for `protocol`, plus the handle its engine writes with.
    pub fn new(protocol: RoutingProtocol) -> (Self, RouteTableHandle) {
        let table = Rc::new(RefCell::new(RouteTable::new()));
        let handle = RouteTableHandle(Rc::clone(&table));
        (Self { protocol, table }, handle)
    }

    #[inline]
    pub fn protocol(&self) -> RoutingProtocol {
        self.protocol
    }
}

impl RoutingSource for ProtocolRoutes {
    fn name(&self) -> &str {
        self.protocol.as_str()
    }

    fn contribution_for(&self, destination: NodeId, now: SimTime) -> Option<RouteEntry> {
        self.table.borrow().lookup(destination, now)
    }
}
