//! Configuration for a simulation run.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::traits::DeviceId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Devices `1..=population` are connected before the group is formed.
    pub population: u32,

    /// Devices admitted to the multicast group, validated in this order.
    pub group_members: Vec<DeviceId>,

    /// Number of packets the driver attempts to send.
    pub packet_count: u64,

    /// Seed for the channel RNG.
    pub seed: u64,

    /// Per-recipient success probability.
    pub reliability: f64,

    pub slot_capacity: u32,
    pub multicast_threshold: u32,
    pub group_resource_id: u32,
    pub packet_size: u32,

    /// Wall-clock pause after each slot. Cosmetic only.
    pub slot_pacing_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population: 10,
            group_members: (1..=7).collect(),
            packet_count: 10,
            seed: 12345,
            reliability: crate::CHANNEL_RELIABILITY,
            slot_capacity: crate::SLOT_CAPACITY,
            multicast_threshold: crate::MULTICAST_THRESHOLD,
            group_resource_id: crate::GROUP_RESOURCE_ID,
            packet_size: crate::PACKET_SIZE_BYTES,
            slot_pacing_ms: 0,
        }
    }
}

impl SimulationConfig {
    pub fn new(population: u32, group_members: Vec<DeviceId>, packet_count: u64) -> Self {
        Self { population, group_members, packet_count, ..Default::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_reliability(mut self, reliability: f64) -> Self {
        self.reliability = reliability;
        self
    }

    pub fn with_resources(mut self, slot_capacity: u32, multicast_threshold: u32) -> Self {
        self.slot_capacity = slot_capacity;
        self.multicast_threshold = multicast_threshold;
        self
    }

    pub fn with_slot_pacing_ms(mut self, ms: u64) -> Self {
        self.slot_pacing_ms = ms;
        self
    }

    /// Group made of the first `size` devices of the population.
    pub fn with_group_size(mut self, size: u32) -> Self {
        self.group_members = (1..=size.min(self.population)).collect();
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(0.0..=1.0).contains(&self.reliability) {
            return Err(SimError::InvalidConfig(format!(
                "reliability must be within [0, 1], got {}",
                self.reliability
            )));
        }
        if self.slot_capacity == 0 {
            return Err(SimError::InvalidConfig("slot capacity must be non-zero".into()));
        }
        if self.group_resource_id == 0 {
            return Err(SimError::InvalidConfig(
                "group resource identifier 0 is reserved for unassigned devices".into(),
            ));
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, SimError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn encode(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
