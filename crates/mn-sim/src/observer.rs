//! Run observer trait for progress reporting and instrumentation.

use mn_core::{FlowId, NodeId, PacketId, SimTime};
use mn_measure::{DropReason, SampleRecord};

/// Callbacks invoked by [`Experiment::run`][crate::Experiment::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait RunObserver {
    /// A sample was taken and persisted.
    fn on_sample(&mut self, _record: &SampleRecord) {}

    /// The routing engine recomputed its tables.
    fn on_routing_refresh(&mut self, _now: SimTime) {}

    /// A source handed a packet to the network.
    fn on_packet_sent(&mut self, _now: SimTime, _flow: FlowId, _packet: PacketId) {}

    /// A packet reached its sink while the sink was listening.
    fn on_packet_delivered(&mut self, _now: SimTime, _sink: NodeId, _packet: PacketId, _hops: u32) {}

    /// A packet was discarded at `node`.
    fn on_packet_dropped(&mut self, _now: SimTime, _node: NodeId, _packet: PacketId, _reason: DropReason) {}

    /// Called once after the last event, before the sink is finished.
    fn on_run_end(&mut self, _now: SimTime) {}
}

/// A [`RunObserver`] that does nothing.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
