//! The random-waypoint process.

use mn_core::{ConfigError, ConfigResult, Position, Region, SimTime, StreamRng};

use crate::{MobilityTrace, Waypoint};

/// Parameters of the random-waypoint movement model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomWaypoint {
    region:     Region,
    max_speed:  f64,
    pause_secs: f64,
}

impl RandomWaypoint {
    /// Validate and build.
    ///
    /// `max_speed <= 0` is rejected: a zero-speed draw never reaches its
    /// target and starves the process.  Use
    /// [`MobilityModel::Stationary`][crate::MobilityModel::Stationary] for
    /// nodes that must not move.
    pub fn new(region: Region, max_speed: f64, pause_secs: f64) -> ConfigResult<Self> {
        if !region.is_valid() {
            return Err(ConfigError::DegenerateRegion { width: region.width, height: region.height });
        }
        if !(max_speed.is_finite() && max_speed > 0.0) {
            return Err(ConfigError::NonPositiveSpeed(max_speed));
        }
        if !(pause_secs.is_finite() && pause_secs >= 0.0) {
            return Err(ConfigError::Invalid {
                field:  "pause_secs",
                reason: format!("{pause_secs} is not a non-negative duration"),
            });
        }
        Ok(Self { region, max_speed, pause_secs })
    }

    #[inline]
    pub fn region(&self) -> Region {
        self.region
    }

    /// Uniform point in the region.
    pub fn random_position(&self, rng: &mut StreamRng) -> Position {
        let x = rng.uniform(0.0, self.region.width);
        let y = rng.uniform(0.0, self.region.height);
        Position::new(x, y)
    }

    /// Run the process from a random initial position until a waypoint at or
    /// past `horizon` has been recorded.
    ///
    /// Draw order per leg is fixed (target x, target y, speed) so a given
    /// stream always yields the same trace.
    pub fn trace(&self, rng: &mut StreamRng, horizon: SimTime) -> MobilityTrace {
        let start = self.random_position(rng);
        let mut waypoints = vec![Waypoint { time: SimTime::ZERO, position: start }];
        let mut here = start;
        let mut now = SimTime::ZERO;

        while now < horizon {
            let target = self.random_position(rng);
            let speed  = rng.uniform_positive(self.max_speed);
            now = now.add_secs_f64(here.distance_to(target) / speed);
            waypoints.push(Waypoint { time: now, position: target });
            here = target;

            if self.pause_secs > 0.0 {
                now = now.add_secs_f64(self.pause_secs);
                waypoints.push(Waypoint { time: now, position: here });
            }
        }

        MobilityTrace::from_waypoints(waypoints)
    }
}
