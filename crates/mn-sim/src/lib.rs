//! `mn-sim` — the discrete-event experiment runner.
//!
//! # Event loop
//!
//! ```text
//! build:
//!   validate config → mobility traces (streams 0..half) → flows (1 stream)
//!   → per node: resolver { static @ static_priority, protocol @ protocol_priority }
//!   → schedule RoutingRefresh (repeating), FlowStart/FlowStop, Sample (repeating, 1 s)
//!
//! run, for each event with time ≤ stop, in (time, sequence) order:
//!   Sample          → ThroughputMonitor::tick → SampleSink::append
//!   RoutingRefresh  → RoutingEngine::refresh(positions, link)
//!   FlowStart(f)    → schedule_repeating(Send(f), payload·8/rate)
//!   FlowStop(f)     → cancel the send task
//!   Send(f)         → new packet at the source → forward
//!   Arrive(p, n)    → deliver at the sink, or resolve next hop → forward
//! ```
//!
//! Forwarding drops a packet with an explicit reason (no route, link out of
//! range, hop limit, sink not listening); drops are counted per flow and
//! exported with the end-of-run statistics.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | [`sweep`] runs replications on Rayon's thread pool.    |
//! | `sqlite`   | Enables `mn_measure::SqliteSampleWriter`.              |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mn_core::ExperimentConfig;
//! use mn_measure::CsvSampleWriter;
//! use mn_sim::{ExperimentBuilder, NoopObserver};
//!
//! let config = ExperimentConfig::default();
//! let experiment = ExperimentBuilder::new(config.clone()).build()?;
//! let mut sink = CsvSampleWriter::create(&config.csv_file)?;
//! let report = experiment.run(&mut sink, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod event_queue;
pub mod experiment;
pub mod link;
pub mod node;
pub mod observer;
pub mod sweep;


pub use builder::ExperimentBuilder;
pub use engine::{RoutingEngine, ShortestPathOracle};
pub use error::{SimError, SimResult};
pub use event_queue::{EventKey, EventQueue, TaskHandle};
pub use experiment::{Experiment, RunReport, DEFAULT_TTL};
pub use link::{FriisRange, LinkModel};
pub use node::{Node, NodeRole};
pub use observer::{NoopObserver, RunObserver};
pub use sweep::{Replication, sweep};
