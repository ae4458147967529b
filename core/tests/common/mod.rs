#![allow(dead_code)]

use std::sync::{Arc, RwLock};

use mcast_core::*;

pub struct TestHarness {
    pub sim: Simulation,
    pub events: Arc<RwLock<Vec<SimEvent>>>,
}

impl TestHarness {
    pub fn new(config: SimulationConfig) -> Self {
        let sink = RecordingSink::new();
        let events = sink.handle();
        let sim = Simulation::new(config)
            .expect("valid config")
            .with_sink(Box::new(sink));
        Self { sim, events }
    }

    /// `population` devices, `group` members, `packets` packets, fixed seed.
    pub fn scenario(population: u32, group: &[DeviceId], packets: u64) -> Self {
        Self::new(SimulationConfig::new(population, group.to_vec(), packets).with_seed(12345))
    }

    pub fn new_with_seed(population: u32, group: &[DeviceId], packets: u64, seed: u64) -> Self {
        Self::new(SimulationConfig::new(population, group.to_vec(), packets).with_seed(seed))
    }

    pub fn with_reliability(population: u32, group: &[DeviceId], packets: u64, reliability: f64) -> Self {
        Self::new(
            SimulationConfig::new(population, group.to_vec(), packets)
                .with_seed(12345)
                .with_reliability(reliability),
        )
    }

    pub fn run(&mut self) -> Result<VerificationReport, SimError> {
        self.sim.run()
    }

    pub fn delivered(&self, id: DeviceId) -> Vec<PacketId> {
        self.sim
            .registry
            .lookup(id)
            .map(|d| d.delivered().to_vec())
            .unwrap_or_default()
    }

    pub fn events(&self) -> Vec<SimEvent> {
        self.events.read().unwrap().clone()
    }

    pub fn scheduled_packet_ids(&self) -> Vec<PacketId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SimEvent::TransmissionScheduled { packet_id, .. } => Some(packet_id),
                _ => None,
            })
            .collect()
    }
}
