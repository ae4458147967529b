use crate::common::TestHarness;
use mcast_core::*;

#[test]
fn test_connect_twice_keeps_device_connected() {
    let mut h = TestHarness::scenario(0, &[], 0);
    let sim = &mut h.sim;
    let mut sink = NullSink;

    assert!(sim.controller.connect_device(&mut sim.registry, 42, &mut sink).is_ok());
    assert_eq!(
        sim.controller.connect_device(&mut sim.registry, 42, &mut sink),
        Err(SimError::AlreadyConnected(42))
    );
    assert_eq!(sim.registry.lookup(42).unwrap().state, ConnectionState::Connected);
}

#[test]
fn test_configure_twice_keeps_first_membership() {
    let mut h = TestHarness::scenario(5, &[1, 2, 3], 0);
    h.run().unwrap();
    let before: Vec<_> = h.sim.registry.devices().map(|d| (d.id, d.group_resource_id)).collect();

    let sim = &mut h.sim;
    let result = sim.controller.configure_group(&mut sim.registry, &[1, 2, 3], &mut NullSink);
    assert_eq!(result, Err(SimError::AlreadyConfigured));

    let after: Vec<_> = h.sim.registry.devices().map(|d| (d.id, d.group_resource_id)).collect();
    assert_eq!(before, after);
}

#[test]
fn test_second_run_keeps_existing_group() {
    let mut h = TestHarness::with_reliability(4, &[1, 2], 2, 1.0);
    h.run().unwrap();

    // A different member list is ignored once the group exists.
    let report = h.sim.run_simulation(4, &[3, 4], 1).unwrap();
    let members: Vec<_> = report.members.iter().map(|m| m.device).collect();
    assert_eq!(members, vec![1, 2]);
    assert_eq!(report.delivered_to(1), Some(&[1u64, 2, 3][..]));
}

#[test]
fn test_partial_group_is_never_admitted() {
    let mut h = TestHarness::scenario(5, &[1, 2, 3, 4, 6], 10);

    assert_eq!(h.run(), Err(SimError::MemberNotConnected(6)));
    assert!(!h.sim.controller.is_configured());
    assert_eq!(h.sim.registry.group_members(1000).count(), 0);
    assert!(h.events().contains(&SimEvent::MemberRejected { device: 6 }));
}
