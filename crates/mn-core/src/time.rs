//! Simulated time.
//!
//! # Design
//!
//! `SimTime` is an absolute instant measured in integer nanoseconds since the
//! start of the run.  Spans between instants are plain
//! [`std::time::Duration`]s.  Integer time keeps event ordering exact: two
//! events scheduled for "1 second" compare equal and are then ordered by
//! insertion sequence, never by floating-point rounding.

use std::fmt;
use std::time::Duration;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// An absolute simulated instant, nanosecond resolution.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub const MAX: SimTime = SimTime(u64::MAX);

    #[inline]
    pub const fn from_secs(secs: u64) -> SimTime {
        SimTime(secs * NANOS_PER_SEC)
    }

    /// Convert fractional seconds, rounding to the nearest nanosecond.
    /// Negative and NaN inputs clamp to zero.
    #[inline]
    pub fn from_secs_f64(secs: f64) -> SimTime {
        if secs.is_nan() || secs <= 0.0 {
            return SimTime::ZERO;
        }
        SimTime((secs * NANOS_PER_SEC as f64).round() as u64)
    }

    /// Like [`from_secs_f64`][Self::from_secs_f64], but `None` for negative,
    /// non-finite, or unrepresentable inputs instead of clamping.  The
    /// result is always below [`SimTime::MAX`].
    pub fn try_from_secs_f64(secs: f64) -> Option<SimTime> {
        let nanos = (secs * NANOS_PER_SEC as f64).round();
        // 2^64 is the first f64 above every u64.
        (secs.is_finite() && secs >= 0.0 && nanos < u64::MAX as f64).then(|| SimTime(nanos as u64))
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC as f64
    }

    /// Whole seconds elapsed (floor).
    #[inline]
    pub fn whole_secs(self) -> u64 {
        self.0 / NANOS_PER_SEC
    }

    /// `self` plus fractional seconds, saturating at [`SimTime::MAX`].
    #[inline]
    pub fn add_secs_f64(self, secs: f64) -> SimTime {
        SimTime(self.0.saturating_add(SimTime::from_secs_f64(secs).0))
    }

    /// Span from `earlier` to `self`, zero if `earlier` is later.
    #[inline]
    pub fn saturating_since(self, earlier: SimTime) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }
}

impl std::ops::Add<Duration> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: Duration) -> SimTime {
        let nanos = u64::try_from(rhs.as_nanos()).unwrap_or(u64::MAX);
        SimTime(self.0.saturating_add(nanos))
    }
}

impl std::ops::Sub for SimTime {
    type Output = Duration;

    /// # Panics
    /// Panics in debug mode if `rhs > self`.
    #[inline]
    fn sub(self, rhs: SimTime) -> Duration {
        Duration::from_nanos(self.0 - rhs.0)
    }
}

impl fmt::Display for SimTime {
    /// Seconds, shortest representation (`1`, `0.2`, `101.734`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_secs_f64())
    }
}
