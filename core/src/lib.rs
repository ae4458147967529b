pub mod analytics;
pub mod channel;
pub mod comparison;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod membership;
pub mod packet;
pub mod registry;
pub mod report;
pub mod scheduler;
pub mod sweep;
pub mod traits;

pub use analytics::{MetricPoint, MetricsCollector};
pub use channel::{ChannelModel, DeliveryOutcome};
pub use comparison::{compare_delivery_modes, ComparisonPoint, LinkBudget, ModeMetrics};
pub use config::SimulationConfig;
pub use engine::Simulation;
pub use error::SimError;
pub use events::{NullSink, RecordingSink, SimEvent, TracingSink};
pub use membership::GroupController;
pub use packet::{Packet, PacketAllocator};
pub use registry::{ConnectionState, Device, DeviceRegistry};
pub use report::{InvariantViolation, MemberDelivery, RunStats, VerificationReport};
pub use scheduler::SlotScheduler;
pub use sweep::{run_population_sweep, SweepResult};
pub use traits::{DeviceId, EventSink, PacketId};

/// Group-resource identifier shared by every member of the multicast group.
pub const GROUP_RESOURCE_ID: u32 = 1000;
/// Resource units available in one slot.
pub const SLOT_CAPACITY: u32 = 100;
/// Resource units one multicast burst needs to be admitted.
pub const MULTICAST_THRESHOLD: u32 = 20;
/// Probability that one recipient decodes one transmission.
pub const CHANNEL_RELIABILITY: f64 = 0.9;
/// Transport block size in bytes.
pub const PACKET_SIZE_BYTES: u32 = 1000;
