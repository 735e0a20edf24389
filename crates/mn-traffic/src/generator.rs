//! Flow pairing and start-time jitter.

use mn_core::{
    ConfigError, ConfigResult, ExperimentConfig, FlowId, NodeId, SimTime, StreamAllocator,
    TimeWindow,
};

use crate::FlowSpec;

/// Builds the `sinks` flows of a run.
///
/// All draws come from one substream.  For each flow the sink start is drawn
/// before the source start, so flow `i`'s two offsets are consecutive values
/// of that stream.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficPatternGenerator {
    pub nodes_per_half:  u32,
    pub sinks:           u32,
    pub payload_bytes:   u32,
    pub rate_bps:        u64,
    pub sink_window:     TimeWindow,
    pub source_window:   TimeWindow,
    pub total_time_secs: f64,
}

impl TrafficPatternGenerator {
    pub fn from_config(config: &ExperimentConfig) -> Self {
        Self {
            nodes_per_half:  config.nodes_per_half,
            sinks:           config.sinks,
            payload_bytes:   config.payload_bytes,
            rate_bps:        config.data_rate_bps,
            sink_window:     config.sink_start,
            source_window:   config.source_start,
            total_time_secs: config.total_time_secs,
        }
    }

    /// Number of substreams [`generate`][Self::generate] allocates.
    pub const STREAMS: u64 = 1;

    /// Check the pattern can be built.  Pure: allocates nothing.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.sinks > self.nodes_per_half {
            return Err(ConfigError::TooManySinks {
                requested: self.sinks,
                available: self.nodes_per_half,
            });
        }
        if self.payload_bytes == 0 {
            return Err(ConfigError::Invalid { field: "payload_bytes", reason: "must be positive".into() });
        }
        if self.rate_bps == 0 {
            return Err(ConfigError::Invalid { field: "data_rate_bps", reason: "must be positive".into() });
        }
        if mn_core::packet_interval(self.payload_bytes, self.rate_bps).is_zero() {
            return Err(ConfigError::Invalid {
                field:  "data_rate_bps",
                reason: "packet interval rounds to zero nanoseconds".into(),
            });
        }
        self.sink_window.validate("sink start", self.total_time_secs)?;
        self.source_window.validate("source start", self.total_time_secs)?;
        Ok(())
    }

    /// Produce one [`FlowSpec`] per sink.
    ///
    /// Validation runs first; on error no stream is consumed and no flow is
    /// produced.  Flow `i` pairs sink `NodeId(i)` with source
    /// `NodeId(nodes_per_half + i)` and stops at the end of the run.
    pub fn generate(&self, streams: &mut StreamAllocator) -> ConfigResult<Vec<FlowSpec>> {
        self.validate()?;

        let block = streams.allocate(Self::STREAMS);
        let mut rng = block.stream(0);
        let stop = SimTime::from_secs_f64(self.total_time_secs);

        let flows = (0..self.sinks)
            .map(|i| {
                let sink_start = rng.uniform(self.sink_window.lo, self.sink_window.hi);
                let start = rng.uniform(self.source_window.lo, self.source_window.hi);
                FlowSpec {
                    id:            FlowId(i),
                    source:        NodeId(self.nodes_per_half + i),
                    sink:          NodeId(i),
                    sink_start:    SimTime::from_secs_f64(sink_start),
                    start:         SimTime::from_secs_f64(start),
                    stop,
                    payload_bytes: self.payload_bytes,
                    rate_bps:      self.rate_bps,
                }
            })
            .collect();
        Ok(flows)
    }
}
