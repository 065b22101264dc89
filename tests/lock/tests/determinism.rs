//! Lock test: same seed ⇒ same plan (objects and continuous parameters)
//! and same metrics, run after run.

use tamp_harness::runner::plan_world;
use tamp_harness::worlds::blocks::BlocksWorld;
use tamp_search::config::PlannerConfig;

#[test]
fn same_seed_produces_identical_plans_and_metrics() {
    lock_tests::init_test_logging();
    let config = PlannerConfig::default();

    let world = BlocksWorld::new(3);
    let (first_plan, first_metrics) = plan_world(&world, &config, 42).unwrap();

    for _ in 0..5 {
        let world = BlocksWorld::new(3);
        let (other_plan, other_metrics) = plan_world(&world, &config, 42).unwrap();
        assert_eq!(first_plan, other_plan, "plans differ across identical runs");
        assert_eq!(first_metrics, other_metrics);
    }

    // The blocks samplers draw their grasp parameters from the seeded rng,
    // so the determinism above covers the continuous layer too.
    assert!(first_plan.iter().all(|option| !option.params().is_empty()));
}

#[test]
fn metrics_snapshot_round_trips_through_serde() {
    let world = BlocksWorld::new(3);
    let config = PlannerConfig::default();
    let (_plan, metrics) = plan_world(&world, &config, 7).unwrap();

    let json = serde_json::to_value(metrics).unwrap();
    assert_eq!(json["plan_length"], 2);
    assert_eq!(json["num_skeletons_optimized"], 1);
    assert_eq!(json["num_failures_discovered"], 0);
}
