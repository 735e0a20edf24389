//! Independent replications of one configuration over several seeds.

use mn_core::ExperimentConfig;
use mn_measure::VecSink;

use crate::{ExperimentBuilder, NoopObserver, RunReport, SimResult};

/// Outcome of one replication.
#[derive(Debug, Clone)]
pub struct Replication {
    pub seed:   u64,
    pub report: RunReport,
}

/// Run `config` once per seed, collecting samples in memory.
///
/// Replications are independent: each builds its own experiment from its
/// own seed and writes no files.  With the `parallel` feature they run on
/// Rayon's thread pool; results are returned in `seeds` order either way.
pub fn sweep(config: &ExperimentConfig, seeds: &[u64]) -> SimResult<Vec<Replication>> {
    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(|&seed| replicate(config, seed)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        seeds.par_iter().map(|&seed| replicate(config, seed)).collect()
    }
}

fn replicate(config: &ExperimentConfig, seed: u64) -> SimResult<Replication> {
    let config = ExperimentConfig { seed, ..config.clone() };
    let experiment = ExperimentBuilder::new(config).build()?;
    let report = experiment.run(&mut VecSink::new(), &mut NoopObserver)?;
    Ok(Replication { seed, report })
}
