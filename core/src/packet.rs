use serde::{Deserialize, Serialize};

use crate::traits::PacketId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub id: PacketId,
    pub payload: String,
    pub size: u32,
    slot: Option<u64>,
}

impl Packet {
    /// Slot the scheduler admitted this packet into, if any.
    pub fn slot(&self) -> Option<u64> {
        self.slot
    }

    /// Writes the slot index. Returns `false` and leaves the packet untouched
    /// if a slot was already assigned.
    pub(crate) fn assign_slot(&mut self, slot: u64) -> bool {
        if self.slot.is_some() {
            return false;
        }
        self.slot = Some(slot);
        true
    }
}

/// Hands out packets with strictly increasing identifiers starting at 1.
#[derive(Debug, Clone)]
pub struct PacketAllocator {
    last_id: PacketId,
    size: u32,
}

impl PacketAllocator {
    pub fn new(size: u32) -> Self {
        Self { last_id: 0, size }
    }

    pub fn next_packet(&mut self) -> Packet {
        self.last_id += 1;
        Packet {
            id: self.last_id,
            payload: format!("Multicast data packet {}", self.last_id),
            size: self.size,
            slot: None,
        }
    }

    /// Number of packets allocated so far.
    pub fn allocated(&self) -> u64 {
        self.last_id
    }
}
