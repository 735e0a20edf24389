//! Fluent builder for constructing an [`Experiment`].

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use mn_core::{AddressPlan, ConfigError, ExperimentConfig, NodeId, SimTime, StreamAllocator};
use mn_measure::{FlowStatsCollector, ThroughputMonitor};
use mn_mobility::MobilityPatternGenerator;
use mn_routing::{RoutingResolver, StaticRoutes};
use mn_traffic::TrafficPatternGenerator;

use crate::experiment::Event;
use crate::node::{Node, NodeRole};
use crate::{EventQueue, Experiment, FriisRange, LinkModel, RoutingEngine, ShortestPathOracle, SimError, SimResult};

/// Route entries written by the default engine outlive this many refresh
/// intervals.
const ROUTE_LIFETIME_REFRESHES: u32 = 3;

/// Fluent builder for [`Experiment`].
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default                                        |
/// |---------------------------|------------------------------------------------|
/// | `.link_model(l)`          | [`FriisRange`] from tx power and link params   |
/// | `.routing_engine(e)`      | [`ShortestPathOracle`] for `config.protocol`   |
/// | `.flow_stats_path(p)`     | no flow statistics export                      |
/// | `.mobility_trace_path(p)` | no mobility trace                              |
///
/// `build` validates everything and generates all patterns but opens no
/// file; an invalid configuration therefore leaves no artifact behind.
///
/// # Example
///
/// ```rust,ignore
/// let experiment = ExperimentBuilder::new(config)
///     .flow_stats_path("run.flowmon.json")
///     .build()?;
/// let mut sink = CsvSampleWriter::create(&csv_path)?;
/// let report = experiment.run(&mut sink, &mut NoopObserver)?;
/// ```
pub struct ExperimentBuilder {
    config:              ExperimentConfig,
    link:                Option<Box<dyn LinkModel>>,
    engine:              Option<Box<dyn RoutingEngine>>,
    flow_stats_path:     Option<PathBuf>,
    mobility_trace_path: Option<PathBuf>,
}

impl ExperimentBuilder {
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            config,
            link:                None,
            engine:              None,
            flow_stats_path:     None,
            mobility_trace_path: None,
        }
    }

    pub fn link_model(mut self, link: impl LinkModel + 'static) -> Self {
        self.link = Some(Box::new(link));
        self
    }

    /// Replace the default engine.  Its protocol must match
    /// `config.protocol`.
    pub fn routing_engine(mut self, engine: impl RoutingEngine + 'static) -> Self {
        self.engine = Some(Box::new(engine));
        self
    }

    /// Export end-of-run flow statistics as JSON to `path`.
    pub fn flow_stats_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.flow_stats_path = Some(path.into());
        self
    }

    /// Write the per-waypoint mobility trace to `path` when the run starts.
    pub fn mobility_trace_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mobility_trace_path = Some(path.into());
        self
    }

    /// Validate the configuration, draw all random patterns, install routing
    /// on every node, and schedule the run.
    pub fn build(self) -> SimResult<Experiment> {
        let config = self.config;
        config.validate()?;

        // Nonzero once `validate` passed.
        let refresh = config.routing_refresh();
        let mut engine: Box<dyn RoutingEngine> = match self.engine {
            Some(e) => e,
            None => Box::new(ShortestPathOracle::new(config.protocol, refresh * ROUTE_LIFETIME_REFRESHES)),
        };
        if engine.protocol() != config.protocol {
            return Err(SimError::ProtocolMismatch { engine: engine.protocol(), configured: config.protocol });
        }
        let link: Box<dyn LinkModel> = match self.link {
            Some(l) => l,
            None => Box::new(FriisRange::new(config.tx_power_dbm, &config.link)),
        };

        // ── Patterns: mobility first, then traffic ────────────────────────
        let stop = config.stop_time();
        let half = config.nodes_per_half;
        let mut streams = StreamAllocator::new(config.seed);

        let mobile = MobilityPatternGenerator::random_waypoint(config.region, config.max_speed, config.pause_secs)?;
        let mut traces = mobile.generate(half, stop, &mut streams);
        traces.extend(MobilityPatternGenerator::stationary(config.stationary_layout).generate(half, stop, &mut streams));

        let flows = TrafficPatternGenerator::from_config(&config).generate(&mut streams)?;

        // ── Nodes and routing ─────────────────────────────────────────────
        let addresses = AddressPlan::default();
        let mut nodes = Vec::with_capacity(traces.len());
        for (i, trace) in traces.into_iter().enumerate() {
            let id = NodeId(i as u32);
            let address = addresses
                .address_of(id)
                .ok_or(ConfigError::TooManyNodes { requested: config.node_count(), capacity: AddressPlan::CAPACITY })?;
            let mut resolver = RoutingResolver::new(id);
            resolver.install(config.static_priority, StaticRoutes::new());
            resolver.install(config.protocol_priority, engine.attach(id));
            let role = if (i as u32) < half { NodeRole::Mobile } else { NodeRole::Stationary };
            nodes.push(Node::new(id, address, role, trace, resolver));
        }

        // ── Schedule ──────────────────────────────────────────────────────
        let mut queue = EventQueue::new();
        queue.schedule_repeating(SimTime::ZERO, refresh, Event::RoutingRefresh);
        for flow in &flows {
            queue.schedule_at(flow.start, Event::FlowStart(flow.id));
            queue.schedule_at(flow.stop, Event::FlowStop(flow.id));
        }
        queue.schedule_repeating(SimTime::from_secs(1), Duration::from_secs(1), Event::Sample);

        let monitor = ThroughputMonitor::new(config.protocol, config.sinks, config.tx_power_dbm)
            .with_address_plan(addresses);
        let stats = FlowStatsCollector::new(&flows, addresses);

        info!(
            nodes = nodes.len(),
            flows = flows.len(),
            protocol = %config.protocol,
            seed = config.seed,
            stop = %stop,
            "experiment ready"
        );

        Ok(Experiment::new(
            config,
            nodes,
            flows,
            queue,
            link,
            engine,
            monitor,
            stats,
            self.flow_stats_path,
            self.mobility_trace_path,
        ))
    }
}
