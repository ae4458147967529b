use crate::common::TestHarness;

#[test]
fn test_determinism_across_runs() {
    let seed = 12345;
    let group: Vec<u32> = (1..=7).collect();

    let mut h1 = TestHarness::new_with_seed(10, &group, 50, seed);
    let r1 = h1.run().unwrap();

    let mut h2 = TestHarness::new_with_seed(10, &group, 50, seed);
    let r2 = h2.run().unwrap();

    assert_eq!(r1, r2, "Reports must match for the same seed");
    assert_eq!(h1.events(), h2.events(), "Event streams must match for the same seed");
}

#[test]
fn test_determinism_with_different_seeds() {
    let group: Vec<u32> = (1..=7).collect();

    let mut h1 = TestHarness::new_with_seed(10, &group, 100, 100);
    let r1 = h1.run().unwrap();

    let mut h2 = TestHarness::new_with_seed(10, &group, 100, 200);
    let r2 = h2.run().unwrap();

    // 700 independent trials each; identical outcomes would be astronomically unlikely.
    assert_ne!(r1.members, r2.members, "Different seeds should produce different results");
}
