use tracing::warn;

use crate::error::SimError;
use crate::events::SimEvent;
use crate::packet::Packet;
use crate::traits::EventSink;

/// Admits at most one multicast burst per slot against a fixed resource pool.
///
/// After every admission the pool is refilled to full capacity and the slot
/// counter advances, so leftover headroom is never reused within a slot.
#[derive(Debug, Clone)]
pub struct SlotScheduler {
    capacity: u32,
    threshold: u32,
    remaining: u32,
    slot: u64,
    units_consumed: u64,
}

impl SlotScheduler {
    pub fn new(capacity: u32, threshold: u32) -> Self {
        Self { capacity, threshold, remaining: capacity, slot: 0, units_consumed: 0 }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn remaining_units(&self) -> u32 {
        self.remaining
    }

    /// Index the next admitted packet will be stamped with.
    pub fn current_slot(&self) -> u64 {
        self.slot
    }

    /// Total units handed out across all admitted bursts.
    pub fn units_consumed(&self) -> u64 {
        self.units_consumed
    }

    pub fn schedule_transmission(
        &mut self,
        packet: &mut Packet,
        group_resource_id: u32,
        sink: &mut dyn EventSink,
    ) -> Result<u64, SimError> {
        if self.remaining < self.threshold {
            let err = SimError::InsufficientResources {
                required: self.threshold,
                remaining: self.remaining,
            };
            sink.emit(SimEvent::TransmissionDropped {
                packet_id: packet.id,
                required: self.threshold,
                remaining: self.remaining,
            });
            return Err(err);
        }

        self.remaining -= self.threshold;
        self.units_consumed += u64::from(self.threshold);
        let slot = self.slot;
        if !packet.assign_slot(slot) {
            warn!(packet_id = packet.id, "packet already carried a slot");
        }
        self.slot += 1;
        self.remaining = self.capacity;

        sink.emit(SimEvent::TransmissionScheduled {
            packet_id: packet.id,
            slot,
            group_resource_id,
        });
        Ok(slot)
    }

    #[cfg(test)]
    pub(crate) fn set_remaining(&mut self, units: u32) {
        self.remaining = units.min(self.capacity);
    }
}
