//! End-of-run per-flow statistics.
//!
//! The collector follows every application packet from transmission to
//! reception or drop and folds the outcome into its flow's counters.
//! Delay is `rx_time - tx_time`; jitter is the absolute difference between
//! the delays of consecutive received packets of the same flow.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use mn_core::{AddressPlan, FlowId, NodeId, PacketId, SimTime};
use mn_traffic::FlowSpec;

use crate::MeasureResult;

/// Why a packet never reached its sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// A resolver on the path had no route to the sink.
    NoRoute,
    /// The chosen next hop was out of range when the frame was sent.
    LinkBroken,
    /// Hop limit exhausted.
    TtlExpired,
    /// Arrived at the sink outside its listening window.
    SinkNotListening,
}

#[derive(Debug, Clone)]
struct FlowAccumulator {
    spec:            FlowSpec,
    tx_packets:      u64,
    tx_bytes:        u64,
    rx_packets:      u64,
    rx_bytes:        u64,
    times_forwarded: u64,
    hop_sum:         u64,
    delay_sum:       Duration,
    jitter_sum:      Duration,
    last_delay:      Option<Duration>,
    first_tx:        Option<SimTime>,
    last_rx:         Option<SimTime>,
    drops:           BTreeMap<DropReason, u64>,
}

impl FlowAccumulator {
    fn new(spec: FlowSpec) -> Self {
        Self {
            spec,
            tx_packets: 0,
            tx_bytes: 0,
            rx_packets: 0,
            rx_bytes: 0,
            times_forwarded: 0,
            hop_sum: 0,
            delay_sum: Duration::ZERO,
            jitter_sum: Duration::ZERO,
            last_delay: None,
            first_tx: None,
            last_rx: None,
            drops: BTreeMap::new(),
        }
    }
}

/// Tracks every packet of every configured flow.
#[derive(Debug, Clone)]
pub struct FlowStatsCollector {
    addresses: AddressPlan,
    flows:     BTreeMap<FlowId, FlowAccumulator>,
    in_flight: HashMap<PacketId, (FlowId, SimTime)>,
}

impl FlowStatsCollector {
    pub fn new(flows: &[FlowSpec], addresses: AddressPlan) -> Self {
        Self {
            addresses,
            flows: flows.iter().map(|f| (f.id, FlowAccumulator::new(*f))).collect(),
            in_flight: HashMap::new(),
        }
    }

    /// The source of `flow` handed `packet` to the network.
    pub fn on_tx(&mut self, flow: FlowId, packet: PacketId, now: SimTime, bytes: u32) {
        let Some(acc) = self.flows.get_mut(&flow) else { return };
        acc.tx_packets += 1;
        acc.tx_bytes += bytes as u64;
        acc.first_tx.get_or_insert(now);
        self.in_flight.insert(packet, (flow, now));
    }

    /// An intermediate node relayed `packet`.
    pub fn on_forward(&mut self, packet: PacketId) {
        if let Some(acc) = self.flow_of(packet) {
            acc.times_forwarded += 1;
        }
    }

    /// `packet` reached its sink after `hops` link traversals.  Returns
    /// `false` for a packet that was never transmitted or already settled.
    pub fn on_rx(&mut self, packet: PacketId, now: SimTime, bytes: u32, hops: u32) -> bool {
        let Some((flow, sent)) = self.in_flight.remove(&packet) else { return false };
        let Some(acc) = self.flows.get_mut(&flow) else { return false };
        let delay = now.saturating_since(sent);
        acc.rx_packets += 1;
        acc.rx_bytes += bytes as u64;
        acc.hop_sum += hops as u64;
        acc.delay_sum += delay;
        if let Some(prev) = acc.last_delay {
            acc.jitter_sum += delay.abs_diff(prev);
        }
        acc.last_delay = Some(delay);
        acc.last_rx = Some(now);
        true
    }

    /// `packet` was discarded.  Returns `false` if it was not in flight.
    pub fn on_drop(&mut self, packet: PacketId, reason: DropReason) -> bool {
        let Some((flow, _)) = self.in_flight.remove(&packet) else { return false };
        let Some(acc) = self.flows.get_mut(&flow) else { return false };
        *acc.drops.entry(reason).or_default() += 1;
        true
    }

    /// Packets transmitted but neither received nor dropped yet.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Fold the counters into an exportable snapshot taken at `end`.
    pub fn summarize(&self, end: SimTime) -> CumulativeFlowStats {
        let mut pending: BTreeMap<FlowId, u64> = BTreeMap::new();
        for (flow, _) in self.in_flight.values() {
            *pending.entry(*flow).or_default() += 1;
        }

        let flows: Vec<FlowRecord> = self
            .flows
            .values()
            .map(|acc| self.record(acc, pending.get(&acc.spec.id).copied().unwrap_or(0)))
            .collect();

        let tx_packets: u64 = flows.iter().map(|f| f.tx_packets).sum();
        let rx_packets: u64 = flows.iter().map(|f| f.rx_packets).sum();
        let delay_sum: f64 = flows.iter().map(|f| f.delay_sum_secs).sum();
        let aggregate = AggregateStats {
            flows:            flows.len(),
            tx_packets,
            tx_bytes:         flows.iter().map(|f| f.tx_bytes).sum(),
            rx_packets,
            rx_bytes:         flows.iter().map(|f| f.rx_bytes).sum(),
            lost_packets:     flows.iter().map(|f| f.lost_packets).sum(),
            in_flight_at_end: self.in_flight.len() as u64,
            delivery_ratio:   ratio(rx_packets as f64, tx_packets),
            mean_delay_secs:  ratio(delay_sum, rx_packets),
        };

        CumulativeFlowStats { end_time_secs: end.as_secs_f64(), flows, aggregate }
    }

    fn flow_of(&mut self, packet: PacketId) -> Option<&mut FlowAccumulator> {
        let (flow, _) = self.in_flight.get(&packet)?;
        self.flows.get_mut(flow)
    }

    fn record(&self, acc: &FlowAccumulator, in_flight: u64) -> FlowRecord {
        let throughput_kbps = match (acc.first_tx, acc.last_rx) {
            (Some(first), Some(last)) if last > first => {
                acc.rx_bytes as f64 * 8.0 / (last - first).as_secs_f64() / 1000.0
            }
            _ => 0.0,
        };
        FlowRecord {
            flow_id:          acc.spec.id,
            source:           acc.spec.source,
            sink:             acc.spec.sink,
            source_address:   self.addresses.address_of(acc.spec.source),
            sink_address:     self.addresses.address_of(acc.spec.sink),
            tx_packets:       acc.tx_packets,
            tx_bytes:         acc.tx_bytes,
            rx_packets:       acc.rx_packets,
            rx_bytes:         acc.rx_bytes,
            lost_packets:     acc.drops.values().sum(),
            in_flight_at_end: in_flight,
            drops:            acc.drops.clone(),
            times_forwarded:  acc.times_forwarded,
            delay_sum_secs:   acc.delay_sum.as_secs_f64(),
            jitter_sum_secs:  acc.jitter_sum.as_secs_f64(),
            mean_delay_secs:  ratio(acc.delay_sum.as_secs_f64(), acc.rx_packets),
            mean_jitter_secs: ratio(acc.jitter_sum.as_secs_f64(), acc.rx_packets.saturating_sub(1)),
            mean_hop_count:   ratio(acc.hop_sum as f64, acc.rx_packets),
            first_tx_secs:    acc.first_tx.map(SimTime::as_secs_f64),
            last_rx_secs:     acc.last_rx.map(SimTime::as_secs_f64),
            throughput_kbps,
        }
    }
}

fn ratio(num: f64, den: u64) -> Option<f64> {
    (den > 0).then(|| num / den as f64)
}

// ── Export types ──────────────────────────────────────────────────────────────

/// Statistics of one flow at the end of the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowRecord {
    pub flow_id:          FlowId,
    pub source:           NodeId,
    pub sink:             NodeId,
    pub source_address:   Option<Ipv4Addr>,
    pub sink_address:     Option<Ipv4Addr>,
    pub tx_packets:       u64,
    pub tx_bytes:         u64,
    pub rx_packets:       u64,
    pub rx_bytes:         u64,
    /// Sum of `drops`.
    pub lost_packets:     u64,
    pub in_flight_at_end: u64,
    pub drops:            BTreeMap<DropReason, u64>,
    pub times_forwarded:  u64,
    pub delay_sum_secs:   f64,
    pub jitter_sum_secs:  f64,
    pub mean_delay_secs:  Option<f64>,
    pub mean_jitter_secs: Option<f64>,
    pub mean_hop_count:   Option<f64>,
    pub first_tx_secs:    Option<f64>,
    pub last_rx_secs:     Option<f64>,
    /// Received bits over `[first_tx, last_rx]`, kbit/s.
    pub throughput_kbps:  f64,
}

/// Totals across all flows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub flows:            usize,
    pub tx_packets:       u64,
    pub tx_bytes:         u64,
    pub rx_packets:       u64,
    pub rx_bytes:         u64,
    pub lost_packets:     u64,
    pub in_flight_at_end: u64,
    pub delivery_ratio:   Option<f64>,
    pub mean_delay_secs:  Option<f64>,
}

/// The end-of-run statistics export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeFlowStats {
    pub end_time_secs: f64,
    pub flows:         Vec<FlowRecord>,
    pub aggregate:     AggregateStats,
}

impl CumulativeFlowStats {
    /// Write pretty-printed JSON to `path`, truncating any existing file.
    pub fn write_json(&self, path: &Path) -> MeasureResult<()> {
        let json = self.to_json_string()?;
        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(json.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }

    /// The same pretty-printed JSON `write_json` emits, without the
    /// trailing newline.
    pub fn to_json_string(&self) -> MeasureResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
