//! `mn-measure` — the live measurement pipeline.
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`monitor`]   | `ThroughputMonitor`: reception counters, 1 s sampling     |
//! | [`row`]       | `SampleRecord` — one per-interval sample                  |
//! | [`writer`]    | `SampleSink` trait, in-memory `VecSink`                   |
//! | [`csv`]       | `CsvSampleWriter` — the throughput time series            |
//! | [`sqlite`]    | `SqliteSampleWriter` (feature `sqlite`)                   |
//! | [`flowstats`] | `FlowStatsCollector`, `CumulativeFlowStats`, JSON export  |
//! | [`trace`]     | `MobilityTraceWriter` — per-waypoint ASCII trace          |
//!
//! Every sink write is fallible and every failure is fatal to the run: the
//! caller receives the [`MeasureError`] and stops without exporting.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mn_measure::{CsvSampleWriter, ThroughputMonitor};
//!
//! let mut sink = CsvSampleWriter::create(Path::new("manet-routing-compare.csv"))?;
//! let mut monitor = ThroughputMonitor::new(RoutingProtocol::Aodv, 15, 7.5);
//! monitor.on_receive(now, NodeId(0), Some(NodeId(15)), 512);
//! monitor.tick(SimTime::from_secs(1), &mut sink)?;
//! ```

pub mod csv;
pub mod error;
pub mod flowstats;
pub mod monitor;
pub mod row;
pub mod trace;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvSampleWriter;
pub use error::{MeasureError, MeasureResult};
pub use flowstats::{AggregateStats, CumulativeFlowStats, DropReason, FlowRecord, FlowStatsCollector};
pub use monitor::ThroughputMonitor;
pub use row::SampleRecord;
pub use trace::MobilityTraceWriter;
pub use writer::{SampleSink, VecSink};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSampleWriter;
