//! Run parameters for one experiment.
//!
//! `ExperimentConfig::default()` reproduces the reference scenario: 15 mobile
//! plus 15 stationary nodes in a 1500 × 300 m strip, random waypoint at up to
//! 20 m/s with no pause, 7.5 dBm transmit power, 15 flows of 512-byte
//! packets at 2048 bit/s starting between 100 s and 101 s, 103 s total.
//!
//! The CLI loads this from JSON (`#[serde(default)]` lets a file override
//! only the fields it names) and then applies command-line overrides.
//! [`validate`][ExperimentConfig::validate] must pass before any output file
//! is opened.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{AddressPlan, ConfigError, ConfigResult, Region, RoutingProtocol, SimTime};

// ── TimeWindow ────────────────────────────────────────────────────────────────

/// A closed interval of simulated seconds used for start-time jitter.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub lo: f64,
    pub hi: f64,
}

impl TimeWindow {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Check the window is well-formed and closes before `total_time`.
    pub fn validate(self, what: &'static str, total_time: f64) -> ConfigResult<()> {
        let err = |reason| ConfigError::InvalidWindow { what, lo: self.lo, hi: self.hi, reason };
        if !self.lo.is_finite() || !self.hi.is_finite() {
            return Err(err("bounds must be finite"));
        }
        if self.lo < 0.0 {
            return Err(err("lower bound is negative"));
        }
        if self.lo > self.hi {
            return Err(err("lower bound exceeds upper bound"));
        }
        if self.hi >= total_time {
            return Err(err("window must end before the run does"));
        }
        Ok(())
    }
}

// ── GridLayout ────────────────────────────────────────────────────────────────

/// Row-first grid placement for the stationary half of the population.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub min_x:      f64,
    pub min_y:      f64,
    pub delta_x:    f64,
    pub delta_y:    f64,
    /// Nodes per row.
    pub grid_width: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self { min_x: 0.0, min_y: 0.0, delta_x: 50.0, delta_y: 200.0, grid_width: 3 }
    }
}

// ── LinkParams ────────────────────────────────────────────────────────────────

/// Parameters of the stand-in link model.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkParams {
    /// Received power below which a frame is lost, dBm.
    pub rx_threshold_dbm: f64,
    /// Carrier frequency, Hz.
    pub frequency_hz:     f64,
    /// PHY data rate, bit/s.
    pub bitrate_bps:      u64,
}

impl Default for LinkParams {
    /// 802.11b channel 1 at 11 Mb/s; −84 dBm is roughly the weakest
    /// signal that rate decodes.
    fn default() -> Self {
        Self { rx_threshold_dbm: -84.0, frequency_hz: 2.412e9, bitrate_bps: 11_000_000 }
    }
}

// ── ExperimentConfig ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Size of each population half.  Node ids `0..n` are the mobile sink
    /// half, `n..2n` the stationary source half.
    pub nodes_per_half: u32,

    /// Deployment area for waypoint selection.
    pub region: Region,

    /// Upper bound of the uniform speed draw, m/s.
    pub max_speed: f64,

    /// Pause at each waypoint, seconds.  Zero means no pause.
    pub pause_secs: f64,

    /// Transmit power, dBm.  Echoed in every sample row.
    pub tx_power_dbm: f64,

    /// Number of source→sink pairs.
    pub sinks: u32,

    /// Application payload per packet, bytes.
    pub payload_bytes: u32,

    /// Application send rate per source, bit/s.
    pub data_rate_bps: u64,

    /// Jitter window for sink listening start.
    pub sink_start: TimeWindow,

    /// Jitter window for source sending start.
    pub source_start: TimeWindow,

    /// Total simulated duration, seconds.  Also every flow's stop time.
    pub total_time_secs: f64,

    /// Per-second throughput time series.
    pub csv_file: PathBuf,

    /// Write the human-readable mobility trace (`<trace name>.mob`).
    pub trace_mobility: bool,

    /// Master seed.  The same seed always produces identical patterns.
    pub seed: u64,

    /// Dynamic protocol installed above static routing.
    pub protocol: RoutingProtocol,

    /// Resolver priority of static routing.
    pub static_priority: u16,

    /// Resolver priority of the dynamic protocol.
    pub protocol_priority: u16,

    pub stationary_layout: GridLayout,

    /// Interval at which the routing engine refreshes its tables, seconds.
    pub routing_refresh_secs: f64,

    pub link: LinkParams,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            nodes_per_half:       15,
            region:               Region::new(1500.0, 300.0),
            max_speed:            20.0,
            pause_secs:           0.0,
            tx_power_dbm:         7.5,
            sinks:                15,
            payload_bytes:        512,
            data_rate_bps:        2048,
            sink_start:           TimeWindow::new(0.0, 1.0),
            source_start:         TimeWindow::new(100.0, 101.0),
            total_time_secs:      103.0,
            csv_file:             PathBuf::from("manet-routing-compare.csv"),
            trace_mobility:       true,
            seed:                 1,
            protocol:             RoutingProtocol::Aodv,
            static_priority:      0,
            protocol_priority:    60,
            stationary_layout:    GridLayout::default(),
            routing_refresh_secs: 1.0,
            link:                 LinkParams::default(),
        }
    }
}

impl ExperimentConfig {
    /// Check every parameter combination.  Pure: touches no files.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.region.is_valid() {
            return Err(ConfigError::DegenerateRegion {
                width:  self.region.width,
                height: self.region.height,
            });
        }
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(ConfigError::NonPositiveSpeed(self.max_speed));
        }
        if !(self.pause_secs.is_finite() && self.pause_secs >= 0.0) {
            return Err(invalid("pause_secs", format!("{} is not a non-negative duration", self.pause_secs)));
        }
        if !(self.total_time_secs.is_finite() && self.total_time_secs >= 1.0) {
            return Err(invalid("total_time_secs", format!("{} is shorter than one sample interval", self.total_time_secs)));
        }
        if SimTime::try_from_secs_f64(self.total_time_secs).is_none() {
            return Err(invalid("total_time_secs", format!("{} s exceeds the simulated clock", self.total_time_secs)));
        }
        if self.nodes_per_half == 0 {
            return Err(invalid("nodes_per_half", "must be at least 1".into()));
        }
        let total_nodes = self.nodes_per_half.saturating_mul(2);
        if total_nodes > AddressPlan::CAPACITY {
            return Err(ConfigError::TooManyNodes { requested: total_nodes, capacity: AddressPlan::CAPACITY });
        }
        if self.sinks > self.nodes_per_half {
            return Err(ConfigError::TooManySinks { requested: self.sinks, available: self.nodes_per_half });
        }
        if self.payload_bytes == 0 {
            return Err(invalid("payload_bytes", "must be positive".into()));
        }
        if self.data_rate_bps == 0 {
            return Err(invalid("data_rate_bps", "must be positive".into()));
        }
        if packet_interval(self.payload_bytes, self.data_rate_bps).is_zero() {
            return Err(invalid("data_rate_bps", "packet interval rounds to zero nanoseconds".into()));
        }
        self.sink_start.validate("sink start", self.total_time_secs)?;
        self.source_start.validate("source start", self.total_time_secs)?;
        if self.routing_refresh().is_zero() {
            return Err(invalid("routing_refresh_secs", format!("{} is not at least one nanosecond", self.routing_refresh_secs)));
        }
        if self.stationary_layout.grid_width == 0 {
            return Err(invalid("stationary_layout.grid_width", "must be at least 1".into()));
        }
        if !self.tx_power_dbm.is_finite() {
            return Err(invalid("tx_power_dbm", "must be finite".into()));
        }
        if self.link.bitrate_bps == 0 || !(self.link.frequency_hz > 0.0) {
            return Err(invalid("link", "bitrate and frequency must be positive".into()));
        }
        Ok(())
    }

    /// Total node count (both halves).
    #[inline]
    pub fn node_count(&self) -> u32 {
        self.nodes_per_half * 2
    }

    /// The instant the run stops.
    #[inline]
    pub fn stop_time(&self) -> SimTime {
        SimTime::from_secs_f64(self.total_time_secs)
    }

    /// Number of samples the 1 s cadence yields: `floor(total_time)`.
    #[inline]
    pub fn sample_count(&self) -> u64 {
        self.total_time_secs.floor() as u64
    }

    /// Gap between two consecutive packets of one source.
    pub fn packet_interval(&self) -> Duration {
        packet_interval(self.payload_bytes, self.data_rate_bps)
    }

    /// Routing refresh period at clock resolution; zero when the configured
    /// value is not a representable positive span.
    pub fn routing_refresh(&self) -> Duration {
        match SimTime::try_from_secs_f64(self.routing_refresh_secs) {
            Some(t) => Duration::from_nanos(t.0),
            None => Duration::ZERO,
        }
    }

    /// Base name shared by the trace artifacts of this run, e.g.
    /// `manet-routing-compare_AODV_15nodes_20speed_0pause_2048bpsrate`.
    pub fn trace_basename(&self) -> String {
        format!(
            "manet-routing-compare_{}_{}nodes_{}speed_{}pause_{}bpsrate",
            self.protocol, self.nodes_per_half, self.max_speed, self.pause_secs, self.data_rate_bps,
        )
    }
}

/// `payload · 8 / rate`, truncated to whole nanoseconds.
pub fn packet_interval(payload_bytes: u32, rate_bps: u64) -> Duration {
    let nanos = payload_bytes as u128 * 8 * 1_000_000_000 / rate_bps.max(1) as u128;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
