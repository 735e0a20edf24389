//! `mn-core` — foundational types for the MANET routing experiment harness.
//!
//! This crate is a dependency of every other `mn-*` crate.  It has no `mn-*`
//! dependencies and minimal external ones (`rand`, `thiserror`, `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `FlowId`, `SourceId`, `PacketId`            |
//! | [`address`]     | `AddressPlan` — node id ↔ IPv4 host address           |
//! | [`geo`]         | `Position`, `Region`                                  |
//! | [`time`]        | `SimTime`                                             |
//! | [`rng`]         | `StreamAllocator`, `StreamBlock`, `StreamRng`         |
//! | [`protocol`]    | `RoutingProtocol` enum                                |
//! | [`config`]      | `ExperimentConfig`, `TimeWindow`, `GridLayout`        |
//! | [`error`]       | `ConfigError`, `ConfigResult`                         |

pub mod address;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod protocol;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use address::AddressPlan;
pub use config::{ExperimentConfig, GridLayout, LinkParams, TimeWindow, packet_interval};
pub use error::{ConfigError, ConfigResult};
pub use geo::{Position, Region};
pub use ids::{FlowId, NodeId, PacketId, SourceId};
pub use protocol::RoutingProtocol;
pub use rng::{StreamAllocator, StreamBlock, StreamRng};
pub use time::SimTime;
