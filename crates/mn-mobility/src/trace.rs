//! Per-node position history.

use mn_core::{Position, SimTime};

/// A node is at `position` at `time`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub time:     SimTime,
    pub position: Position,
}

/// Ordered waypoints with linear motion between consecutive entries.
///
/// Before the first waypoint the node sits at the first position; after the
/// last it stays at the last.  Two consecutive waypoints at the same position
/// encode a pause.
#[derive(Debug, Clone, PartialEq)]
pub struct MobilityTrace {
    waypoints: Vec<Waypoint>,
}

impl MobilityTrace {
    /// A node that never moves.
    pub fn stationary(position: Position) -> Self {
        Self { waypoints: vec![Waypoint { time: SimTime::ZERO, position }] }
    }

    /// Build from waypoints already sorted by time.
    pub(crate) fn from_waypoints(waypoints: Vec<Waypoint>) -> Self {
        debug_assert!(!waypoints.is_empty());
        debug_assert!(waypoints.windows(2).all(|w| w[0].time <= w[1].time));
        Self { waypoints }
    }

    #[inline]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    #[inline]
    pub fn initial_position(&self) -> Position {
        self.waypoints[0].position
    }

    /// Interpolated position at `now`.
    pub fn position_at(&self, now: SimTime) -> Position {
        match self.segment(now) {
            Segment::Fixed(p) => p,
            Segment::Between(a, b) => {
                let span = (b.time.0 - a.time.0) as f64;
                let t = (now.0 - a.time.0) as f64 / span;
                a.position.lerp(b.position, t)
            }
        }
    }

    /// Velocity `(vx, vy)` in m/s at `now`; zero while paused or stationary.
    pub fn velocity_at(&self, now: SimTime) -> (f64, f64) {
        match self.segment(now) {
            Segment::Fixed(_) => (0.0, 0.0),
            Segment::Between(a, b) => {
                let secs = (b.time - a.time).as_secs_f64();
                (
                    (b.position.x - a.position.x) / secs,
                    (b.position.y - a.position.y) / secs,
                )
            }
        }
    }

    /// `true` if the trace covers `horizon` (the last waypoint is at or past it).
    pub fn covers(&self, horizon: SimTime) -> bool {
        self.waypoints.last().is_some_and(|w| w.time >= horizon) || self.waypoints.len() == 1
    }

    fn segment(&self, now: SimTime) -> Segment {
        let after = self.waypoints.partition_point(|w| w.time <= now);
        if after == 0 {
            return Segment::Fixed(self.waypoints[0].position);
        }
        if after == self.waypoints.len() {
            return Segment::Fixed(self.waypoints[after - 1].position);
        }
        let (a, b) = (self.waypoints[after - 1], self.waypoints[after]);
        if a.time == b.time || a.position == b.position {
            Segment::Fixed(a.position)
        } else {
            Segment::Between(a, b)
        }
    }
}

enum Segment {
    Fixed(Position),
    Between(Waypoint, Waypoint),
}
