//! One configured source→sink pairing.

use std::time::Duration;

use serde::Serialize;

use mn_core::{FlowId, NodeId, SimTime};

/// Immutable description of a constant-bit-rate flow.
///
/// The sink listens during `[sink_start, stop)`, the source sends one
/// `payload_bytes` packet every [`packet_interval`][Self::packet_interval]
/// during `[start, stop)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlowSpec {
    pub id:            FlowId,
    pub source:        NodeId,
    pub sink:          NodeId,
    pub sink_start:    SimTime,
    pub start:         SimTime,
    pub stop:          SimTime,
    pub payload_bytes: u32,
    pub rate_bps:      u64,
}

impl FlowSpec {
    /// Time between two consecutive packets: `payload · 8 / rate`.
    pub fn packet_interval(&self) -> Duration {
        mn_core::packet_interval(self.payload_bytes, self.rate_bps)
    }

    /// `true` while the sink endpoint accepts packets.
    #[inline]
    pub fn sink_listening(&self, now: SimTime) -> bool {
        self.sink_start <= now && now < self.stop
    }

    /// Number of packets the source emits if every send slot fires.
    pub fn expected_packets(&self) -> u64 {
        let active = self.stop.saturating_since(self.start).as_nanos();
        let interval = self.packet_interval().as_nanos().max(1);
        active.div_ceil(interval) as u64
    }
}
