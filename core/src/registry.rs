use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::traits::{DeviceId, PacketId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Idle,
    Connected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub state: ConnectionState,
    /// 0 while the device belongs to no group.
    pub group_resource_id: u32,
    pub last_ack: bool,
    delivered: Vec<PacketId>,
}

impl Device {
    fn new(id: DeviceId) -> Self {
        Self {
            id,
            state: ConnectionState::Idle,
            group_resource_id: 0,
            last_ack: false,
            delivered: Vec::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn is_member_of(&self, group_resource_id: u32) -> bool {
        group_resource_id != 0 && self.group_resource_id == group_resource_id
    }

    /// Packets this device decoded, in delivery order.
    pub fn delivered(&self) -> &[PacketId] {
        &self.delivered
    }

    pub fn record_delivery(&mut self, packet_id: PacketId) {
        self.delivered.push(packet_id);
    }
}

/// Per-device connection and group state. Records are created on first
/// registration and live until the registry is dropped.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    // Ordered so that iteration, and with it RNG consumption, is reproducible.
    devices: BTreeMap<DeviceId, Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the record if absent and moves it Idle -> Connected.
    /// Returns `false` when the device was already connected.
    pub fn register(&mut self, id: DeviceId) -> bool {
        let device = self.devices.entry(id).or_insert_with(|| Device::new(id));
        match device.state {
            ConnectionState::Idle => {
                device.state = ConnectionState::Connected;
                true
            }
            ConnectionState::Connected => false,
        }
    }

    pub fn lookup(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(&id)
    }

    pub fn lookup_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.devices.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn group_members(&self, group_resource_id: u32) -> impl Iterator<Item = &Device> {
        self.devices.values().filter(move |d| d.is_member_of(group_resource_id))
    }

    /// Mutable view of the devices that belong to the group right now.
    pub fn group_members_mut(&mut self, group_resource_id: u32) -> impl Iterator<Item = &mut Device> {
        self.devices.values_mut().filter(move |d| d.is_member_of(group_resource_id))
    }
}
