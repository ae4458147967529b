use mcast_core::*;

#[test]
fn test_sweep_results_are_order_independent() {
    let base = SimulationConfig::new(0, vec![], 15).with_seed(7);

    let forward = run_population_sweep(&base, &[5, 10, 20]).unwrap();
    let reverse = run_population_sweep(&base, &[20, 10, 5]).unwrap();

    assert_eq!(forward.iter().map(|r| r.population).collect::<Vec<_>>(), vec![5, 10, 20]);
    assert_eq!(forward[0], reverse[2]);
    assert_eq!(forward[2], reverse[0]);
}

#[test]
fn test_sweep_instance_matches_standalone_run() {
    let base = SimulationConfig::new(0, vec![], 10).with_seed(99);
    let result = run_population_sweep(&base, &[10]).unwrap().remove(0);

    let config = SimulationConfig::new(10, (1..=7).collect(), 10).with_seed(result.seed);
    let standalone = Simulation::new(config).unwrap().with_sink(Box::new(NullSink)).run().unwrap();

    assert_eq!(result.group_size, 7);
    assert_eq!(result.report, standalone);
}

#[test]
fn test_sweep_non_members_stay_empty() {
    let base = SimulationConfig::new(0, vec![], 30);
    for result in run_population_sweep(&base, &[3, 9, 27, 81]).unwrap() {
        assert!(result.report.is_clean());
        assert_eq!(
            result.report.members.len() + result.report.non_members.len(),
            result.population as usize
        );
    }
}

#[test]
fn test_sweep_rejects_invalid_base() {
    let base = SimulationConfig::new(0, vec![], 1).with_reliability(-0.1);
    assert!(matches!(run_population_sweep(&base, &[5]), Err(SimError::InvalidConfig(_))));
}
