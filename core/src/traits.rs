use crate::events::SimEvent;

pub type DeviceId = u32;
pub type PacketId = u64;

/// Consumer of the structured event stream.
///
/// The simulation owns exactly one sink and hands it to each layer as
/// `&mut dyn EventSink`; nothing in the core depends on what the sink does
/// with the events.
pub trait EventSink {
    fn emit(&mut self, event: SimEvent);
}
