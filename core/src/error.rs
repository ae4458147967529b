use thiserror::Error;

use crate::traits::{DeviceId, PacketId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("device {0} is already connected")]
    AlreadyConnected(DeviceId),

    #[error("multicast group is already configured")]
    AlreadyConfigured,

    #[error("device {0} is not connected, cannot join multicast group")]
    MemberNotConnected(DeviceId),

    #[error("insufficient resources: need {required} units, {remaining} remaining")]
    InsufficientResources { required: u32, remaining: u32 },

    #[error("non-member device {device} received packets {packets:?}")]
    InvariantViolation {
        device: DeviceId,
        packets: Vec<PacketId>,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SimError {
    /// Errors the driver absorbs locally instead of aborting the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SimError::AlreadyConnected(_)
                | SimError::AlreadyConfigured
                | SimError::InsufficientResources { .. }
        )
    }
}
