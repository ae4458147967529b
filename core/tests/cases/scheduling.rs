use crate::common::TestHarness;
use mcast_core::*;

#[test]
fn test_one_burst_per_slot() {
    let mut h = TestHarness::scenario(10, &[1, 2, 3], 12);
    let report = h.run().unwrap();

    assert_eq!(h.sim.scheduler.current_slot(), 12);
    assert_eq!(h.sim.scheduler.remaining_units(), 100);
    assert_eq!(report.stats.slots_used, 12);
    assert_eq!(report.stats.dropped_opportunities, 0);

    let slots: Vec<u64> = h
        .events()
        .into_iter()
        .filter_map(|e| match e {
            SimEvent::TransmissionScheduled { slot, .. } => Some(slot),
            _ => None,
        })
        .collect();
    assert_eq!(slots, (0..12).collect::<Vec<_>>());
}

#[test]
fn test_packet_ids_strictly_increase() {
    let mut h = TestHarness::scenario(3, &[1, 2, 3], 30);
    h.run().unwrap();

    let ids = h.scheduled_packet_ids();
    assert_eq!(ids.len(), 30);
    assert_eq!(ids[0], 1);
    assert!(ids.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn test_dropped_opportunities_do_not_abort_the_run() {
    let config = SimulationConfig::new(4, vec![1, 2], 5)
        .with_resources(100, 150)
        .with_reliability(1.0);
    let mut h = TestHarness::new(config);
    let report = h.run().unwrap();

    assert_eq!(report.stats.packets_sent, 5);
    assert_eq!(report.stats.dropped_opportunities, 5);
    assert_eq!(report.stats.slots_used, 0);
    assert_eq!(h.sim.scheduler.remaining_units(), 100);
    assert!(report.members.iter().all(|m| m.delivered.is_empty()));

    let drops = h
        .events()
        .into_iter()
        .filter(|e| matches!(e, SimEvent::TransmissionDropped { required: 150, remaining: 100, .. }))
        .count();
    assert_eq!(drops, 5);
}

#[test]
fn test_pool_is_full_or_unchanged_after_every_call() {
    let mut h = TestHarness::scenario(2, &[1], 0);
    h.run().unwrap();

    for _ in 0..20 {
        let before = h.sim.scheduler.remaining_units();
        let outcomes = h.sim.send_packet();
        let after = h.sim.scheduler.remaining_units();
        assert!(after == h.sim.scheduler.capacity() || after == before);
        assert_eq!(outcomes.len(), 1);
    }
}

#[test]
fn test_slot_pacing_does_not_change_outcomes() {
    let base = SimulationConfig::new(6, vec![1, 3, 5], 4).with_seed(77);
    let mut unpaced = TestHarness::new(base.clone());
    let mut paced = TestHarness::new(base.with_slot_pacing_ms(1));

    let started = std::time::Instant::now();
    let paced_report = paced.run().unwrap();
    assert!(started.elapsed() >= std::time::Duration::from_millis(4));

    assert_eq!(paced_report, unpaced.run().unwrap());
    assert_eq!(paced.events(), unpaced.events());
}
