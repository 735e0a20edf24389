//! `mn-mobility` — node placement and movement patterns.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`trace`]     | `Waypoint`, `MobilityTrace` — piecewise-linear position history |
//! | [`waypoint`]  | `RandomWaypoint` — the waypoint-selection process               |
//! | [`placement`] | `grid_positions` — explicit stationary placement                |
//! | [`generator`] | `MobilityPatternGenerator` — one trace per node from substreams |
//!
//! # Movement model
//!
//! A random-waypoint node repeatedly picks a uniform target in the region
//! and a uniform speed in `(0, max_speed]`, travels there in a straight line,
//! then pauses.  Each leg is recorded as waypoints; the position at any
//! instant is the linear interpolation between the surrounding waypoints.
//! Traces are generated up to the run horizon at setup, so a run never
//! draws mobility randomness after the first event.

pub mod generator;
pub mod placement;
pub mod trace;
pub mod waypoint;


pub use generator::{MobilityModel, MobilityPatternGenerator};
pub use placement::grid_positions;
pub use trace::{MobilityTrace, Waypoint};
pub use waypoint::RandomWaypoint;
