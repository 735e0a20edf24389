//! The `Experiment` struct and its event loop.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, error, info};

use mn_core::{ExperimentConfig, FlowId, NodeId, PacketId, Position, SimTime};
use mn_measure::{
    CumulativeFlowStats, DropReason, FlowStatsCollector, MobilityTraceWriter, SampleRecord,
    SampleSink, ThroughputMonitor,
};
use mn_traffic::FlowSpec;

use crate::event_queue::TaskHandle;
use crate::node::Node;
use crate::{EventQueue, LinkModel, RoutingEngine, RunObserver, SimResult};

/// Hop limit of a freshly sent packet.
pub const DEFAULT_TTL: u8 = 64;

// ── Events ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Packet {
    id:     PacketId,
    flow:   FlowId,
    source: NodeId,
    sink:   NodeId,
    size:   u32,
    hops:   u32,
    ttl:    u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    /// Close the current measurement window (repeating, 1 s).
    Sample,
    /// Let the routing engine recompute its tables (repeating).
    RoutingRefresh,
    /// Begin the constant-bit-rate send task of a flow.
    FlowStart(FlowId),
    /// Cancel it.
    FlowStop(FlowId),
    /// One packet of a flow is due (repeating while the flow is on).
    Send(FlowId),
    /// `packet` finished a hop and is now at `at`.
    Arrive { packet: Packet, at: NodeId },
}

// ── RunReport ─────────────────────────────────────────────────────────────────

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Every sample, in tick order.  Length is `floor(total_time)`.
    pub samples:          Vec<SampleRecord>,
    pub packets_sent:     u64,
    pub received_bytes:   u64,
    pub received_packets: u64,
    /// `None` when the run had no flows.
    pub flow_stats:       Option<CumulativeFlowStats>,
    pub end_time:         SimTime,
}

// ── Experiment ────────────────────────────────────────────────────────────────

/// One fully set-up run: nodes with traces and resolvers, the flow set, and
/// the pre-scheduled event queue.
///
/// Create via [`ExperimentBuilder`][crate::ExperimentBuilder]; consume with
/// [`run`][Self::run].
pub struct Experiment {
    config:              ExperimentConfig,
    nodes:               Vec<Node>,
    flows:               Vec<FlowSpec>,
    queue:               EventQueue<Event>,
    link:                Box<dyn LinkModel>,
    engine:              Box<dyn RoutingEngine>,
    monitor:             ThroughputMonitor,
    stats:               FlowStatsCollector,
    senders:             HashMap<FlowId, TaskHandle>,
    next_packet:         u64,
    flow_stats_path:     Option<PathBuf>,
    mobility_trace_path: Option<PathBuf>,
}

impl Experiment {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        config:              ExperimentConfig,
        nodes:               Vec<Node>,
        flows:               Vec<FlowSpec>,
        queue:               EventQueue<Event>,
        link:                Box<dyn LinkModel>,
        engine:              Box<dyn RoutingEngine>,
        monitor:             ThroughputMonitor,
        stats:               FlowStatsCollector,
        flow_stats_path:     Option<PathBuf>,
        mobility_trace_path: Option<PathBuf>,
    ) -> Self {
        Self {
            config,
            nodes,
            flows,
            queue,
            link,
            engine,
            monitor,
            stats,
            senders: HashMap::new(),
            next_packet: 0,
            flow_stats_path,
            mobility_trace_path,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn flows(&self) -> &[FlowSpec] {
        &self.flows
    }

    /// Events already scheduled, before the run starts.
    #[inline]
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    // ── Run ───────────────────────────────────────────────────────────────

    /// Process every event due up to and including the stop time.
    ///
    /// Each sample is appended to `sink` as soon as it is taken.  A sink or
    /// export failure ends the run immediately with the error; flow
    /// statistics are then not exported.
    pub fn run<S, O>(mut self, sink: &mut S, observer: &mut O) -> SimResult<RunReport>
    where
        S: SampleSink + ?Sized,
        O: RunObserver,
    {
        let stop = self.config.stop_time();

        if let Some(path) = &self.mobility_trace_path {
            let mut writer = MobilityTraceWriter::create(path)?;
            writer.write_all(self.nodes.iter().map(Node::trace), stop)?;
            writer.finish()?;
            debug!(path = %path.display(), lines = writer.lines(), "mobility trace written");
        }

        while let Some((now, event)) = self.queue.pop_until(stop) {
            match event {
                Event::Sample => {
                    let record = self.monitor.tick(now, sink).inspect_err(|e| {
                        error!(%now, error = %e, "sample sink failed; aborting run");
                    })?;
                    observer.on_sample(&record);
                }
                Event::RoutingRefresh => {
                    let positions = self.positions_at(now);
                    self.engine.refresh(now, &positions, self.link.as_ref());
                    observer.on_routing_refresh(now);
                }
                Event::FlowStart(id) => self.start_flow(now, id),
                Event::FlowStop(id) => {
                    if let Some(handle) = self.senders.remove(&id) {
                        self.queue.cancel(handle);
                    }
                }
                Event::Send(id) => self.send(now, id, observer),
                Event::Arrive { packet, at } => self.forward(now, packet, at, observer),
            }
        }

        observer.on_run_end(stop);
        sink.finish()?;

        let flow_stats = (!self.flows.is_empty()).then(|| self.stats.summarize(stop));
        if let (Some(stats), Some(path)) = (&flow_stats, &self.flow_stats_path) {
            stats.write_json(path).inspect_err(|e| {
                error!(path = %path.display(), error = %e, "flow statistics export failed");
            })?;
        }

        let (received_bytes, received_packets) = self.monitor.totals();
        info!(
            samples = self.monitor.series().len(),
            sent = self.next_packet,
            received = received_packets,
            bytes = received_bytes,
            "run complete"
        );

        Ok(RunReport {
            samples: self.monitor.series().to_vec(),
            packets_sent: self.next_packet,
            received_bytes,
            received_packets,
            flow_stats,
            end_time: stop,
        })
    }

    // ── Traffic ───────────────────────────────────────────────────────────

    fn start_flow(&mut self, now: SimTime, id: FlowId) {
        let Some(flow) = self.flows.get(id.index()) else { return };
        let handle = self.queue.schedule_repeating(now, flow.packet_interval(), Event::Send(id));
        self.senders.insert(id, handle);
        debug!(%now, flow = id.0, source = flow.source.0, sink = flow.sink.0, "flow started");
    }

    fn send<O: RunObserver>(&mut self, now: SimTime, id: FlowId, observer: &mut O) {
        let Some(flow) = self.flows.get(id.index()).copied() else { return };
        if now >= flow.stop {
            return;
        }
        let packet = Packet {
            id:     PacketId(self.next_packet),
            flow:   id,
            source: flow.source,
            sink:   flow.sink,
            size:   flow.payload_bytes,
            hops:   0,
            ttl:    DEFAULT_TTL,
        };
        self.next_packet += 1;
        self.stats.on_tx(id, packet.id, now, packet.size);
        observer.on_packet_sent(now, id, packet.id);
        self.forward(now, packet, flow.source, observer);
    }

    // ── Forwarding ────────────────────────────────────────────────────────

    /// Deliver `packet` if `at` is its sink, otherwise resolve the next hop
    /// and schedule the arrival there.
    fn forward<O: RunObserver>(&mut self, now: SimTime, packet: Packet, at: NodeId, observer: &mut O) {
        if at == packet.sink {
            let listening = self.flows.get(packet.flow.index()).is_some_and(|f| f.sink_listening(now));
            if listening {
                self.monitor.on_receive(now, at, Some(packet.source), packet.size);
                self.stats.on_rx(packet.id, now, packet.size, packet.hops);
                observer.on_packet_delivered(now, at, packet.id, packet.hops);
            } else {
                self.drop_packet(now, at, packet, DropReason::SinkNotListening, observer);
            }
            return;
        }
        if packet.ttl == 0 {
            self.drop_packet(now, at, packet, DropReason::TtlExpired, observer);
            return;
        }

        let decision = match self.nodes[at.index()].resolver().resolve(packet.sink, now) {
            Ok(d) => d,
            Err(e) => {
                debug!(error = %e, "no route");
                self.drop_packet(now, at, packet, DropReason::NoRoute, observer);
                return;
            }
        };
        let next = decision.next_hop;
        let Some(next_node) = self.nodes.get(next.index()) else {
            self.drop_packet(now, at, packet, DropReason::LinkBroken, observer);
            return;
        };
        let from = self.nodes[at.index()].position_at(now);
        let to = next_node.position_at(now);
        if !self.link.can_reach(from, to) {
            self.drop_packet(now, at, packet, DropReason::LinkBroken, observer);
            return;
        }

        if at != packet.source {
            self.stats.on_forward(packet.id);
        }
        let delay = self.link.hop_delay(packet.size, from, to);
        let packet = Packet { hops: packet.hops + 1, ttl: packet.ttl - 1, ..packet };
        self.queue.schedule_after(delay, Event::Arrive { packet, at: next });
    }

    fn drop_packet<O: RunObserver>(
        &mut self,
        now:      SimTime,
        at:       NodeId,
        packet:   Packet,
        reason:   DropReason,
        observer: &mut O,
    ) {
        debug!(%now, node = at.0, packet = packet.id.0, ?reason, "packet dropped");
        self.stats.on_drop(packet.id, reason);
        observer.on_packet_dropped(now, at, packet.id, reason);
    }

    fn positions_at(&self, now: SimTime) -> Vec<Position> {
        self.nodes.iter().map(|n| n.position_at(now)).collect()
    }
}
