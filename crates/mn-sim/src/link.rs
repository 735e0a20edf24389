//! Link reachability between two positions.
//!
//! The harness only needs two answers from the physical layer: can a frame
//! sent from here be received there, and how long does one hop take.
//! [`FriisRange`] answers both from free-space path loss and a fixed receive
//! threshold; it models no fading, interference, or contention.

use std::time::Duration;

use mn_core::{LinkParams, Position};

const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Physical-layer stand-in consulted for every hop.
pub trait LinkModel {
    /// `true` if a frame sent at `from` is received at `to`.
    fn can_reach(&self, from: Position, to: Position) -> bool;

    /// Airtime plus propagation for one `bytes`-long frame.
    fn hop_delay(&self, bytes: u32, from: Position, to: Position) -> Duration;

    /// Upper bound on any reachable distance, metres.  Used to bound
    /// neighbour searches.
    fn max_range(&self) -> f64;
}

/// Disc model: every receiver within [`range_m`][Self::range_m] hears the
/// sender, nobody else does.
///
/// The range solves the Friis equation for the distance at which received
/// power drops to the threshold (unit antenna gains, no system loss):
///
/// ```text
/// d = λ / (4π) · 10^((P_tx − P_threshold) / 20)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FriisRange {
    range_m:     f64,
    bitrate_bps: u64,
}

impl FriisRange {
    pub fn new(tx_power_dbm: f64, params: &LinkParams) -> Self {
        let wavelength = SPEED_OF_LIGHT / params.frequency_hz;
        let margin_db = tx_power_dbm - params.rx_threshold_dbm;
        let range_m = wavelength / (4.0 * std::f64::consts::PI) * 10f64.powf(margin_db / 20.0);
        Self { range_m, bitrate_bps: params.bitrate_bps.max(1) }
    }

    /// A fixed-range model, bypassing the power budget.
    pub fn with_range(range_m: f64, bitrate_bps: u64) -> Self {
        Self { range_m, bitrate_bps: bitrate_bps.max(1) }
    }

    #[inline]
    pub fn range_m(&self) -> f64 {
        self.range_m
    }
}

impl LinkModel for FriisRange {
    #[inline]
    fn can_reach(&self, from: Position, to: Position) -> bool {
        from.distance_to(to) <= self.range_m
    }

    fn hop_delay(&self, bytes: u32, from: Position, to: Position) -> Duration {
        let airtime_ns = bytes as u128 * 8 * 1_000_000_000 / self.bitrate_bps as u128;
        let propagation_ns = (from.distance_to(to) / SPEED_OF_LIGHT * 1e9).round() as u128;
        Duration::from_nanos(u64::try_from(airtime_ns + propagation_ns).unwrap_or(u64::MAX))
    }

    #[inline]
    fn max_range(&self) -> f64 {
        self.range_m
    }
}
