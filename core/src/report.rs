//! End-of-run verification: who received what, and whether anyone outside
//! the group received anything at all.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::analytics::MetricPoint;
use crate::error::SimError;
use crate::events::SimEvent;
use crate::registry::DeviceRegistry;
use crate::traits::{DeviceId, EventSink, PacketId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDelivery {
    pub device: DeviceId,
    pub delivered: Vec<PacketId>,
    pub last_ack: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantViolation {
    pub device: DeviceId,
    pub packets: Vec<PacketId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub packets_sent: u64,
    pub packets_scheduled: u64,
    pub dropped_opportunities: u64,
    pub slots_used: u64,
    pub acks: u64,
    pub nacks: u64,
    pub observed_reliability: Option<f64>,
    pub resource_units_consumed: u64,
    /// Units the same deliveries would have cost with one burst per member.
    pub unicast_equivalent_units: u64,
    /// Most recent admitted slots, oldest first.
    pub slot_history: Vec<MetricPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub group_resource_id: u32,
    pub members: Vec<MemberDelivery>,
    pub non_members: Vec<DeviceId>,
    pub violations: Vec<InvariantViolation>,
    pub stats: RunStats,
}

impl VerificationReport {
    /// Walks the registry once. Every non-member with a non-empty delivered
    /// sequence becomes a violation and is emitted to the sink.
    pub fn build(
        registry: &DeviceRegistry,
        group_resource_id: u32,
        stats: RunStats,
        sink: &mut dyn EventSink,
    ) -> Self {
        let mut members = Vec::new();
        let mut non_members = Vec::new();
        let mut violations = Vec::new();

        for device in registry.devices() {
            if device.is_member_of(group_resource_id) {
                members.push(MemberDelivery {
                    device: device.id,
                    delivered: device.delivered().to_vec(),
                    last_ack: device.last_ack,
                });
                continue;
            }
            non_members.push(device.id);
            if !device.delivered().is_empty() {
                error!(device = device.id, packets = ?device.delivered(), "non-member received multicast data");
                sink.emit(SimEvent::InvariantViolated {
                    device: device.id,
                    packets: device.delivered().to_vec(),
                });
                violations.push(InvariantViolation {
                    device: device.id,
                    packets: device.delivered().to_vec(),
                });
            }
        }

        Self { group_resource_id, members, non_members, violations, stats }
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Fails with the first violation found, if any.
    pub fn verify(self) -> Result<Self, SimError> {
        match self.violations.first() {
            Some(v) => Err(SimError::InvariantViolation { device: v.device, packets: v.packets.clone() }),
            None => Ok(self),
        }
    }

    pub fn delivered_to(&self, device: DeviceId) -> Option<&[PacketId]> {
        self.members
            .iter()
            .find(|m| m.device == device)
            .map(|m| m.delivered.as_slice())
    }
}
