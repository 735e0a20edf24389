//! Plain data row written once per sampling interval.

use serde::Serialize;

use mn_core::{RoutingProtocol, SimTime};

/// Receptions counted during the interval ending at `time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleRecord {
    pub time:         SimTime,
    pub bytes:        u64,
    pub packets:      u64,
    /// Configured sink count, echoed for post-processing.
    pub sink_count:   u32,
    pub protocol:     RoutingProtocol,
    pub tx_power_dbm: f64,
}

impl SampleRecord {
    /// Receive rate over a 1 s window in kbit/s: `bytes · 8 / 1000`.
    #[inline]
    pub fn rate_kbps(&self) -> f64 {
        self.bytes as f64 * 8.0 / 1000.0
    }
}
