use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::traits::{DeviceId, EventSink, PacketId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    ConnectionEstablished {
        device: DeviceId,
    },
    GroupConfigured {
        group_resource_id: u32,
        members: Vec<DeviceId>,
    },
    MemberRejected {
        device: DeviceId,
    },
    TransmissionScheduled {
        packet_id: PacketId,
        slot: u64,
        group_resource_id: u32,
    },
    TransmissionDropped {
        packet_id: PacketId,
        required: u32,
        remaining: u32,
    },
    Delivery {
        packet_id: PacketId,
        slot: u64,
        device: DeviceId,
        ack: bool,
    },
    InvariantViolated {
        device: DeviceId,
        packets: Vec<PacketId>,
    },
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: SimEvent) {}
}

/// Writes every event to `tracing`, prefixed with the layer that produced it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: SimEvent) {
        match event {
            SimEvent::ConnectionEstablished { device } => {
                info!(device, "RRC: device moved to CONNECTED state");
            }
            SimEvent::GroupConfigured { group_resource_id, members } => {
                info!(group_resource_id, ?members, "RRC: multicast group configured");
            }
            SimEvent::MemberRejected { device } => {
                warn!(device, "RRC: device not connected, cannot join multicast");
            }
            SimEvent::TransmissionScheduled { packet_id, slot, group_resource_id } => {
                info!(packet_id, slot, group_resource_id, "MAC: scheduled multicast packet");
            }
            SimEvent::TransmissionDropped { packet_id, required, remaining } => {
                warn!(packet_id, required, remaining, "MAC: insufficient resources for multicast");
            }
            SimEvent::Delivery { packet_id, slot, device, ack } => {
                let status = if ack { "ACK" } else { "NACK" };
                info!(packet_id, slot, device, status, "PHY: delivery outcome");
            }
            SimEvent::InvariantViolated { device, packets } => {
                error!(device, ?packets, "non-member device received multicast data");
            }
        }
    }
}

/// Keeps every event in memory. Clone the sink (or call [`RecordingSink::handle`])
/// before handing it to a simulation to read the events back afterwards.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<RwLock<Vec<SimEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Arc<RwLock<Vec<SimEvent>>> {
        Arc::clone(&self.events)
    }

    pub fn events(&self) -> Vec<SimEvent> {
        self.events.read().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: SimEvent) {
        if let Ok(mut events) = self.events.write() {
            events.push(event);
        }
    }
}
