//! Setup-time configuration errors.
//!
//! Every variant is detected before the first event is scheduled and aborts
//! the run; no output file is created for a configuration that fails here.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("sink count {requested} exceeds the {available} nodes available in each half")]
    TooManySinks { requested: u32, available: u32 },

    #[error("maximum node speed must be positive and finite, got {0}")]
    NonPositiveSpeed(f64),

    #[error("region {width} x {height} is degenerate")]
    DegenerateRegion { width: f64, height: f64 },

    #[error("{what} window [{lo}, {hi}] is invalid: {reason}")]
    InvalidWindow {
        what:   &'static str,
        lo:     f64,
        hi:     f64,
        reason: &'static str,
    },

    #[error("{requested} nodes do not fit the address plan ({capacity} hosts)")]
    TooManyNodes { requested: u32, capacity: u32 },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
