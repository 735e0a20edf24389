//! `mn-traffic` — the fixed set of source→sink flows of one run.
//!
//! The population is split into two equal halves: ids `0..half` form the
//! sink half, ids `half..2·half` the source half.  Flow `i` pairs sink `i`
//! with source `half + i`.  Start times are jittered from one dedicated
//! substream so that changing the traffic pattern never disturbs mobility.

pub mod flow;
pub mod generator;

#[cfg(test)]
mod tests;

pub use flow::FlowSpec;
pub use generator::TrafficPatternGenerator;
