//! Reception counters and the fixed-cadence sampler.
//!
//! # Design
//!
//! Reception notifications add into a pair of window counters.  Once per
//! second the sampler takes both counters in one step, so a reception is
//! counted in exactly one window: the one whose tick runs first after it.
//! Receptions scheduled at the same instant as a tick but queued before it
//! land in that tick's window.

use std::net::Ipv4Addr;

use tracing::info;

use mn_core::{AddressPlan, NodeId, RoutingProtocol, SimTime};

use crate::writer::SampleSink;
use crate::{MeasureResult, SampleRecord};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Window {
    bytes:   u64,
    packets: u64,
}

/// Counts received application traffic and emits one [`SampleRecord`] per
/// sampling tick.
#[derive(Debug)]
pub struct ThroughputMonitor {
    protocol:     RoutingProtocol,
    sink_count:   u32,
    tx_power_dbm: f64,
    addresses:    AddressPlan,
    window:       Window,
    total:        Window,
    series:       Vec<SampleRecord>,
}

impl ThroughputMonitor {
    pub fn new(protocol: RoutingProtocol, sink_count: u32, tx_power_dbm: f64) -> Self {
        Self {
            protocol,
            sink_count,
            tx_power_dbm,
            addresses: AddressPlan::default(),
            window: Window::default(),
            total: Window::default(),
            series: Vec::new(),
        }
    }

    /// Render sender addresses from `plan` instead of the default subnet.
    pub fn with_address_plan(mut self, plan: AddressPlan) -> Self {
        self.addresses = plan;
        self
    }

    /// Count one received packet of `size` bytes.
    ///
    /// `sender` is `None` when the originating node cannot be identified.
    pub fn on_receive(&mut self, now: SimTime, receiver: NodeId, sender: Option<NodeId>, size: u32) {
        self.window.bytes = self.window.bytes.saturating_add(size as u64);
        self.window.packets = self.window.packets.saturating_add(1);
        self.total.bytes = self.total.bytes.saturating_add(size as u64);
        self.total.packets = self.total.packets.saturating_add(1);

        match sender.and_then(|s| self.sender_address(s)) {
            Some(addr) => info!(
                target: "mn_measure::reception",
                "{now} {} received one packet from {addr}",
                receiver.0
            ),
            None => info!(target: "mn_measure::reception", "{now} {} received one packet!", receiver.0),
        }
    }

    /// Close the current window at `now`: record it, hand it to `sink`, and
    /// reset the counters.
    ///
    /// The counters are reset before the sink is called; a sink error is
    /// returned unchanged and ends the run.  The sample joins
    /// [`series`][Self::series] only once the sink accepted it.
    pub fn tick<S: SampleSink + ?Sized>(&mut self, now: SimTime, sink: &mut S) -> MeasureResult<SampleRecord> {
        let Window { bytes, packets } = std::mem::take(&mut self.window);
        let record = SampleRecord {
            time: now,
            bytes,
            packets,
            sink_count: self.sink_count,
            protocol: self.protocol,
            tx_power_dbm: self.tx_power_dbm,
        };
        sink.append(&record)?;
        self.series.push(record);
        Ok(record)
    }

    /// Every sample taken so far, in tick order.
    #[inline]
    pub fn series(&self) -> &[SampleRecord] {
        &self.series
    }

    /// `(bytes, packets)` received since the last tick.
    #[inline]
    pub fn pending(&self) -> (u64, u64) {
        (self.window.bytes, self.window.packets)
    }

    /// `(bytes, packets)` received over the whole run.
    #[inline]
    pub fn totals(&self) -> (u64, u64) {
        (self.total.bytes, self.total.packets)
    }

    fn sender_address(&self, sender: NodeId) -> Option<Ipv4Addr> {
        self.addresses.address_of(sender)
    }
}
