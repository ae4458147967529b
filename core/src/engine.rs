use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::analytics::MetricsCollector;
use crate::channel::{ChannelModel, DeliveryOutcome};
use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::events::TracingSink;
use crate::membership::GroupController;
use crate::packet::PacketAllocator;
use crate::registry::DeviceRegistry;
use crate::report::{RunStats, VerificationReport};
use crate::scheduler::SlotScheduler;
use crate::traits::{DeviceId, EventSink};

const HISTORY_POINTS: usize = 1024;

/// One base station serving one multicast group.
///
/// Owns every piece of mutable state for the run; the membership, scheduling
/// and channel layers borrow the registry and sink for the duration of a call.
pub struct Simulation<R: Rng = ChaCha8Rng> {
    pub config: SimulationConfig,
    pub registry: DeviceRegistry,
    pub controller: GroupController,
    pub scheduler: SlotScheduler,
    pub channel: ChannelModel,
    pub metrics: MetricsCollector,
    packets: PacketAllocator,
    rng: R,
    sink: Box<dyn EventSink>,
}

impl Simulation<ChaCha8Rng> {
    /// Builds a simulation whose channel RNG is seeded from `config.seed`.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    pub fn with_rng(config: SimulationConfig, rng: R) -> Result<Self, SimError> {
        config.validate()?;
        if config.multicast_threshold > config.slot_capacity {
            warn!(
                threshold = config.multicast_threshold,
                capacity = config.slot_capacity,
                "multicast threshold exceeds slot capacity, no packet can be scheduled"
            );
        }
        Ok(Self {
            registry: DeviceRegistry::new(),
            controller: GroupController::new(config.group_resource_id),
            scheduler: SlotScheduler::new(config.slot_capacity, config.multicast_threshold),
            channel: ChannelModel::new(config.reliability),
            metrics: MetricsCollector::new(HISTORY_POINTS),
            packets: PacketAllocator::new(config.packet_size),
            rng,
            sink: Box::new(TracingSink),
            config,
        })
    }

    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Runs with the population, group and packet count from the config.
    pub fn run(&mut self) -> Result<VerificationReport, SimError> {
        let group = self.config.group_members.clone();
        self.run_simulation(self.config.population, &group, self.config.packet_count)
    }

    /// Connects devices `1..=population`, forms the group from
    /// `group_members`, then sends `packet_count` packets.
    ///
    /// Fails if the group cannot be formed, or if the final report shows a
    /// non-member holding any packet.
    pub fn run_simulation(
        &mut self,
        population: u32,
        group_members: &[DeviceId],
        packet_count: u64,
    ) -> Result<VerificationReport, SimError> {
        info!(population, group_size = group_members.len(), packet_count, "Starting simulation");

        for id in 1..=population {
            if let Err(e) = self.controller.connect_device(&mut self.registry, id, &mut *self.sink) {
                debug!(device = id, error = %e, "connect skipped");
            }
        }

        match self.controller.configure_group(&mut self.registry, group_members, &mut *self.sink) {
            Ok(()) => {}
            // A group formed by an earlier call on this instance still stands.
            Err(e) if e.is_recoverable() => warn!(error = %e, "keeping existing multicast group"),
            Err(e) => return Err(e),
        }

        for _ in 0..packet_count {
            self.send_packet();
            if self.config.slot_pacing_ms > 0 {
                std::thread::sleep(Duration::from_millis(self.config.slot_pacing_ms));
            }
        }

        let report = VerificationReport::build(
            &self.registry,
            self.controller.group_resource_id(),
            self.stats(),
            &mut *self.sink,
        );
        info!(
            members = report.members.len(),
            non_members = report.non_members.len(),
            acks = report.stats.acks,
            nacks = report.stats.nacks,
            dropped = report.stats.dropped_opportunities,
            "Simulation finished"
        );
        report.verify()
    }

    /// Allocates one packet and pushes it through scheduling and the channel.
    /// Returns no outcomes when the scheduler has no room for it.
    pub fn send_packet(&mut self) -> Vec<DeliveryOutcome> {
        let mut packet = self.packets.next_packet();
        let group_resource_id = self.controller.group_resource_id();

        let slot = match self.scheduler.schedule_transmission(&mut packet, group_resource_id, &mut *self.sink) {
            Ok(slot) => slot,
            Err(e) => {
                warn!(packet_id = packet.id, error = %e, "dropped transmission opportunity");
                self.metrics.record_drop();
                return Vec::new();
            }
        };

        let outcomes = self.channel.transmit(
            &packet,
            self.registry.group_members_mut(group_resource_id),
            &mut self.rng,
            &mut *self.sink,
        );
        self.metrics.record_slot(slot, &outcomes);
        outcomes
    }

    pub fn stats(&self) -> RunStats {
        let members = self.registry.group_members(self.controller.group_resource_id()).count() as u64;
        let scheduled = self.scheduler.current_slot();
        RunStats {
            packets_sent: self.packets.allocated(),
            packets_scheduled: scheduled,
            dropped_opportunities: self.metrics.dropped(),
            slots_used: scheduled,
            acks: self.metrics.total_acks(),
            nacks: self.metrics.total_nacks(),
            observed_reliability: self.metrics.observed_reliability(),
            resource_units_consumed: self.scheduler.units_consumed(),
            unicast_equivalent_units: scheduled * members * u64::from(self.scheduler.threshold()),
            slot_history: self.metrics.history.iter().copied().collect(),
        }
    }
}
