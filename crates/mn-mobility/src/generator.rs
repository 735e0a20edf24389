//! One mobility trace per node, drawn from dedicated substreams.

use mn_core::{ConfigResult, GridLayout, Region, SimTime, StreamAllocator};

use crate::{MobilityTrace, RandomWaypoint, grid_positions};

/// Which movement model a group of nodes follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MobilityModel {
    RandomWaypoint(RandomWaypoint),
    /// Fixed grid placement; consumes no randomness.
    Stationary(GridLayout),
}

/// Produces the traces of one node group.
///
/// A random-waypoint generator reserves one stream per node, so node `i`'s
/// trace depends only on the run seed and the block's base offset, not on
/// how many draws any other node (or any other generator) made.
#[derive(Debug, Clone, Copy)]
pub struct MobilityPatternGenerator {
    model: MobilityModel,
}

impl MobilityPatternGenerator {
    pub fn new(model: MobilityModel) -> Self {
        Self { model }
    }

    pub fn random_waypoint(region: Region, max_speed: f64, pause_secs: f64) -> ConfigResult<Self> {
        RandomWaypoint::new(region, max_speed, pause_secs)
            .map(|rw| Self::new(MobilityModel::RandomWaypoint(rw)))
    }

    pub fn stationary(layout: GridLayout) -> Self {
        Self::new(MobilityModel::Stationary(layout))
    }

    #[inline]
    pub fn model(&self) -> &MobilityModel {
        &self.model
    }

    /// Streams this generator reserves for `node_count` nodes.
    pub fn streams_needed(&self, node_count: u32) -> u64 {
        match self.model {
            MobilityModel::RandomWaypoint(_) => node_count as u64,
            MobilityModel::Stationary(_) => 0,
        }
    }

    /// Generate `node_count` traces covering `[0, horizon]`.
    pub fn generate(
        &self,
        node_count: u32,
        horizon:    SimTime,
        streams:    &mut StreamAllocator,
    ) -> Vec<MobilityTrace> {
        let block = streams.allocate(self.streams_needed(node_count));
        match &self.model {
            MobilityModel::RandomWaypoint(rw) => (0..node_count as u64)
                .map(|i| rw.trace(&mut block.stream(i), horizon))
                .collect(),
            MobilityModel::Stationary(layout) => grid_positions(layout, node_count)
                .into_iter()
                .map(MobilityTrace::stationary)
                .collect(),
        }
    }
}
