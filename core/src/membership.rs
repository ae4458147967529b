//! Connection setup and all-or-nothing multicast group formation.

use tracing::debug;

use crate::error::SimError;
use crate::events::SimEvent;
use crate::registry::DeviceRegistry;
use crate::traits::{DeviceId, EventSink};

#[derive(Debug, Clone)]
pub struct GroupController {
    group_resource_id: u32,
    configured: bool,
}

impl GroupController {
    pub fn new(group_resource_id: u32) -> Self {
        Self { group_resource_id, configured: false }
    }

    pub fn group_resource_id(&self) -> u32 {
        self.group_resource_id
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn connect_device(
        &self,
        registry: &mut DeviceRegistry,
        id: DeviceId,
        sink: &mut dyn EventSink,
    ) -> Result<(), SimError> {
        if !registry.register(id) {
            debug!(device = id, "connection request ignored, already connected");
            return Err(SimError::AlreadyConnected(id));
        }
        sink.emit(SimEvent::ConnectionEstablished { device: id });
        Ok(())
    }

    /// Stamps every listed device with the group-resource identifier, or none
    /// of them. Members are validated in the order given.
    pub fn configure_group(
        &mut self,
        registry: &mut DeviceRegistry,
        member_ids: &[DeviceId],
        sink: &mut dyn EventSink,
    ) -> Result<(), SimError> {
        if self.configured {
            return Err(SimError::AlreadyConfigured);
        }

        if let Some(&rejected) = member_ids
            .iter()
            .find(|&&id| !registry.lookup(id).is_some_and(|d| d.is_connected()))
        {
            sink.emit(SimEvent::MemberRejected { device: rejected });
            return Err(SimError::MemberNotConnected(rejected));
        }

        for &id in member_ids {
            if let Some(device) = registry.lookup_mut(id) {
                device.group_resource_id = self.group_resource_id;
            }
        }
        self.configured = true;

        sink.emit(SimEvent::GroupConfigured {
            group_resource_id: self.group_resource_id,
            members: member_ids.to_vec(),
        });
        Ok(())
    }
}
