//! `mn-routing` — routing sources and the per-node forwarding resolver.
//!
//! # Crate layout
//!
//! | Module              | Contents                                                   |
//! |---------------------|------------------------------------------------------------|
//! | [`source`]          | `RoutingSource` trait, `RouteEntry`                        |
//! | [`static_routes`]   | `StaticRoutes` — host routes plus an optional default      |
//! | [`table`]           | `RouteTable`, `ProtocolRoutes`, `RouteTableHandle`         |
//! | [`resolver`]        | `RoutingResolver`, `ForwardingDecision`                    |
//! | [`error`]           | `NoRouteFound`                                             |
//!
//! # Composition
//!
//! Each node owns one [`RoutingResolver`] with a fixed list of sources, each
//! installed with a priority.  A lookup walks the sources from highest to
//! lowest priority (installation order breaks ties) and returns the first
//! contribution.  Metrics of different sources are never compared: hop counts
//! and link-state costs are not commensurable, so priority alone decides.
//!
//! Sources are read-only from the resolver's side.  A protocol engine that
//! keeps its routes in a [`RouteTable`] writes them through a
//! [`RouteTableHandle`]; the resolver sees the change on its next lookup
//! because nothing is cached between lookups.

pub mod error;
pub mod resolver;
pub mod source;
pub mod static_routes;
pub mod table;

#[cfg(test)]
mod tests;

pub use error::NoRouteFound;
pub use resolver::{ForwardingDecision, RoutingResolver};
pub use source::{RouteEntry, RoutingSource};
pub use static_routes::StaticRoutes;
pub use table::{ProtocolRoutes, RouteTable, RouteTableHandle};
