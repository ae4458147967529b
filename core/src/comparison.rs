//! Link-level comparison of unicast and multicast delivery.
//!
//! Devices are dropped uniformly over a circular cell, each gets an SINR from
//! a free-space path loss model, and an MCS is chosen from the SINR. Unicast
//! serves every device at its own MCS with its own resource units; multicast
//! serves the whole group once at the MCS of the weakest device.
//!
//! Delivery per slot is a Bernoulli trial at `1 - bler_target`, drawn through
//! the same [`ChannelModel`] the slot simulation uses.

use hdrhistogram::Histogram;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::channel::ChannelModel;
use crate::error::SimError;
use crate::sweep::instance_seed;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkBudget {
    pub cell_radius_m: f64,
    pub bandwidth_hz: f64,
    pub resource_units: u32,
    pub tx_power_dbm: f64,
    pub noise_power_dbm: f64,
    pub carrier_hz: f64,
    /// Constant bit rate each device must be served at.
    pub data_rate_bps: f64,
    pub slots: u32,
    /// Bits per symbol for each MCS index.
    pub mcs_table: Vec<f64>,
    /// Minimum SINR (dB) for each MCS index, ascending.
    pub sinr_thresholds_db: Vec<f64>,
    pub bler_target: f64,
}

impl Default for LinkBudget {
    fn default() -> Self {
        Self {
            cell_radius_m: 500.0,
            bandwidth_hz: 20e6,
            resource_units: 100,
            tx_power_dbm: 40.0,
            noise_power_dbm: -90.0,
            carrier_hz: 3.5e9,
            data_rate_bps: 4e6,
            slots: 100,
            mcs_table: (1..=10).map(|i| f64::from(i * 2)).collect(),
            sinr_thresholds_db: (0..10).map(|i| f64::from(i * 5)).collect(),
            bler_target: 0.1,
        }
    }
}

impl LinkBudget {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.mcs_table.is_empty() || self.mcs_table.len() != self.sinr_thresholds_db.len() {
            return Err(SimError::InvalidConfig(
                "MCS table and SINR thresholds must be non-empty and the same length".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.bler_target) {
            return Err(SimError::InvalidConfig(format!("BLER target {} outside [0, 1]", self.bler_target)));
        }
        if self.resource_units == 0 || self.slots == 0 {
            return Err(SimError::InvalidConfig("resource units and slots must be non-zero".into()));
        }
        Ok(())
    }

    fn unit_bandwidth_hz(&self) -> f64 {
        self.bandwidth_hz / f64::from(self.resource_units)
    }

    /// Units one device needs to sustain the CBR at the mean MCS.
    pub fn units_per_device(&self) -> u32 {
        let mean_mcs = self.mcs_table.iter().sum::<f64>() / self.mcs_table.len() as f64;
        (self.data_rate_bps / (self.unit_bandwidth_hz() * mean_mcs)).ceil() as u32
    }

    /// Free-space path loss in dB.
    pub fn path_loss_db(&self, distance_m: f64) -> f64 {
        let d_km = distance_m.max(1.0) / 1000.0;
        32.45 + 20.0 * d_km.log10() + 20.0 * (self.carrier_hz / 1e6).log10()
    }

    pub fn sinr_db(&self, distance_m: f64) -> f64 {
        self.tx_power_dbm - self.path_loss_db(distance_m) - self.noise_power_dbm
    }

    /// Highest MCS index whose threshold the SINR meets.
    pub fn mcs_index(&self, sinr_db: f64) -> Option<usize> {
        self.sinr_thresholds_db.iter().rposition(|&t| t <= sinr_db)
    }

    fn rate_bps(&self, mcs: usize) -> f64 {
        self.mcs_table[mcs] * self.unit_bandwidth_hz() * f64::from(self.units_per_device())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeMetrics {
    pub per_device_rate_mbps: f64,
    pub reliability_pct: f64,
    /// Reliability of the device at the 10th percentile.
    pub worst_decile_reliability_pct: f64,
    pub units_used: u32,
    pub throughput_mbps: f64,
    pub bler_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub population: u32,
    pub seed: u64,
    pub unicast: ModeMetrics,
    pub multicast: ModeMetrics,
}

/// Evaluates every population in parallel, each with its own seeded RNG.
pub fn compare_delivery_modes(
    budget: &LinkBudget,
    populations: &[u32],
    base_seed: u64,
) -> Result<Vec<ComparisonPoint>, SimError> {
    budget.validate()?;
    populations
        .par_iter()
        .map(|&population| {
            let seed = instance_seed(base_seed, population);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            compare_population(budget, population, &mut rng).map(|(unicast, multicast)| ComparisonPoint {
                population,
                seed,
                unicast,
                multicast,
            })
        })
        .collect()
}

/// Drops `population` devices and measures both delivery modes over the same
/// placement.
pub fn compare_population(
    budget: &LinkBudget,
    population: u32,
    rng: &mut impl Rng,
) -> Result<(ModeMetrics, ModeMetrics), SimError> {
    let sinrs: Vec<f64> = (0..population)
        .map(|_| budget.sinr_db(budget.cell_radius_m * rng.gen::<f64>().sqrt()))
        .collect();
    let channel = ChannelModel::new(1.0 - budget.bler_target);
    let upd = budget.units_per_device();

    let unicast_mcs: Vec<Option<usize>> = sinrs.iter().map(|&s| budget.mcs_index(s)).collect();
    let unicast_rates: Vec<f64> = unicast_mcs.iter().map(|m| m.map_or(0.0, |i| budget.rate_bps(i))).collect();
    let served: Vec<bool> = unicast_mcs.iter().map(Option::is_some).collect();
    let unicast_successes = draw_successes(&channel, budget.slots, &served, rng);
    let unicast = summarize(
        budget,
        mean(&unicast_rates),
        upd.saturating_mul(population).min(budget.resource_units),
        &unicast_successes,
        &served,
    )?;

    let min_sinr = sinrs.iter().copied().fold(f64::INFINITY, f64::min);
    let group_mcs = if sinrs.is_empty() { None } else { budget.mcs_index(min_sinr) };
    let eligible: Vec<bool> = sinrs
        .iter()
        .map(|&s| group_mcs.is_some_and(|i| s >= budget.sinr_thresholds_db[i]))
        .collect();
    let multicast_successes = draw_successes(&channel, budget.slots, &eligible, rng);
    let multicast = summarize(
        budget,
        group_mcs.map_or(0.0, |i| budget.rate_bps(i)),
        upd,
        &multicast_successes,
        &eligible,
    )?;

    Ok((unicast, multicast))
}

fn draw_successes(channel: &ChannelModel, slots: u32, eligible: &[bool], rng: &mut impl Rng) -> Vec<u32> {
    eligible
        .iter()
        .map(|&ok| if ok { (0..slots).filter(|_| channel.trial(rng)).count() as u32 } else { 0 })
        .collect()
}

fn summarize(
    budget: &LinkBudget,
    rate_bps: f64,
    units_used: u32,
    successes: &[u32],
    served: &[bool],
) -> Result<ModeMetrics, SimError> {
    let slots = f64::from(budget.slots);
    let ratios: Vec<f64> = successes.iter().map(|&s| f64::from(s) / slots).collect();
    // Unserved devices count as zero reliability and zero BLER.
    let blers: Vec<f64> = ratios
        .iter()
        .zip(served)
        .map(|(&r, &ok)| if ok { 1.0 - r } else { 0.0 })
        .collect();
    let total: u64 = successes.iter().map(|&s| u64::from(s)).sum();

    Ok(ModeMetrics {
        per_device_rate_mbps: rate_bps / 1e6,
        reliability_pct: mean(&ratios) * 100.0,
        worst_decile_reliability_pct: percentile_pct(successes, budget.slots, 10.0)?,
        units_used,
        throughput_mbps: total as f64 * budget.data_rate_bps / slots / 1e6,
        bler_pct: mean(&blers) * 100.0,
    })
}

fn percentile_pct(successes: &[u32], slots: u32, quantile: f64) -> Result<f64, SimError> {
    if successes.is_empty() {
        return Ok(0.0);
    }
    let mut hist = Histogram::<u64>::new_with_max(u64::from(slots).max(2), 3)
        .map_err(|e| SimError::InvalidConfig(format!("histogram: {e:?}")))?;
    for &s in successes {
        hist.record(u64::from(s))
            .map_err(|e| SimError::InvalidConfig(format!("histogram: {e:?}")))?;
    }
    Ok(hist.value_at_quantile(quantile / 100.0) as f64 / f64::from(slots) * 100.0)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
