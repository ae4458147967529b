use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::events::SimEvent;
use crate::packet::Packet;
use crate::registry::Device;
use crate::traits::{DeviceId, EventSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub device: DeviceId,
    pub ack: bool,
}

/// Independent Bernoulli delivery per recipient.
#[derive(Debug, Clone, Copy)]
pub struct ChannelModel {
    reliability: f64,
}

impl ChannelModel {
    pub fn new(reliability: f64) -> Self {
        Self { reliability: reliability.clamp(0.0, 1.0) }
    }

    pub fn reliability(&self) -> f64 {
        self.reliability
    }

    /// One success trial. A reliability of 1.0 always succeeds and 0.0 never does.
    pub fn trial(&self, rng: &mut impl Rng) -> bool {
        rng.gen::<f64>() < self.reliability
    }

    /// Delivers `packet` to each recipient in the snapshot, exactly one trial
    /// per recipient, and records the outcome on the device.
    pub fn transmit<'a, I>(
        &self,
        packet: &Packet,
        recipients: I,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Vec<DeliveryOutcome>
    where
        I: IntoIterator<Item = &'a mut Device>,
    {
        let slot = packet.slot().unwrap_or_default();
        recipients
            .into_iter()
            .map(|device| {
                let ack = self.trial(rng);
                device.last_ack = ack;
                if ack {
                    device.record_delivery(packet.id);
                }
                sink.emit(SimEvent::Delivery { packet_id: packet.id, slot, device: device.id, ack });
                DeliveryOutcome { device: device.id, ack }
            })
            .collect()
    }
}

impl Default for ChannelModel {
    fn default() -> Self {
        Self::new(crate::CHANNEL_RELIABILITY)
    }
}
