use crate::common::TestHarness;
use mcast_core::*;

#[test]
fn test_event_order_for_single_packet() {
    let mut h = TestHarness::with_reliability(3, &[1, 2], 1, 1.0);
    h.run().unwrap();

    assert_eq!(
        h.events(),
        vec![
            SimEvent::ConnectionEstablished { device: 1 },
            SimEvent::ConnectionEstablished { device: 2 },
            SimEvent::ConnectionEstablished { device: 3 },
            SimEvent::GroupConfigured { group_resource_id: 1000, members: vec![1, 2] },
            SimEvent::TransmissionScheduled { packet_id: 1, slot: 0, group_resource_id: 1000 },
            SimEvent::Delivery { packet_id: 1, slot: 0, device: 1, ack: true },
            SimEvent::Delivery { packet_id: 1, slot: 0, device: 2, ack: true },
        ]
    );
}

#[test]
fn test_deliveries_only_address_members() {
    let mut h = TestHarness::scenario(8, &[2, 5, 7], 20);
    h.run().unwrap();

    let mut per_packet = std::collections::BTreeMap::<u64, Vec<u32>>::new();
    for event in h.events() {
        if let SimEvent::Delivery { packet_id, device, .. } = event {
            per_packet.entry(packet_id).or_default().push(device);
        }
    }
    assert_eq!(per_packet.len(), 20);
    assert!(per_packet.values().all(|devices| devices == &vec![2, 5, 7]));
}

#[test]
fn test_events_serialize_as_tagged_json() {
    let event = SimEvent::TransmissionScheduled { packet_id: 3, slot: 2, group_resource_id: 1000 };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "transmission_scheduled");
    assert_eq!(value["slot"], 2);
}
