//! Independent simulations over a range of population sizes.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::engine::Simulation;
use crate::error::SimError;
use crate::events::NullSink;
use crate::report::VerificationReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub population: u32,
    pub group_size: u32,
    pub seed: u64,
    pub report: VerificationReport,
}

/// Seed for the instance simulating `population`, independent of how many
/// other instances run or in which order.
pub fn instance_seed(base_seed: u64, population: u32) -> u64 {
    // splitmix64 finalizer
    let mut z = base_seed ^ u64::from(population).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Group size used for a population: the first 70% of devices, rounded up.
pub fn group_size_for(population: u32) -> u32 {
    (u64::from(population) * 7).div_ceil(10) as u32
}

/// Runs one simulation per entry of `populations` in parallel. Each run owns
/// its own registry, scheduler and RNG. Results come back in input order.
pub fn run_population_sweep(
    base: &SimulationConfig,
    populations: &[u32],
) -> Result<Vec<SweepResult>, SimError> {
    base.validate()?;
    populations
        .par_iter()
        .map(|&population| -> Result<SweepResult, SimError> {
            let seed = instance_seed(base.seed, population);
            let group_size = group_size_for(population);
            let config = SimulationConfig { population, slot_pacing_ms: 0, ..base.clone() }
                .with_group_size(group_size)
                .with_seed(seed);
            let report = Simulation::new(config)?.with_sink(Box::new(NullSink)).run()?;
            Ok(SweepResult { population, group_size, seed, report })
        })
        .collect()
}
