//! Lock tests: discovered-failure propagation and the recovery rewrite.
//!
//! In the cluttered world the simulator refuses to pick while the obstacle
//! is present and names it. Recovery must plant the marker so the failing
//! ground operator is never re-attempted verbatim, and planning must then
//! route through `clear-path`.

use tamp_harness::runner::plan_world;
use tamp_harness::worlds::cluttered::ClutteredWorld;
use tamp_search::config::{FailurePropagation, PlannerConfig};

#[test]
fn immediate_propagation_recovers_and_plans_around_the_obstacle() {
    lock_tests::init_test_logging();
    let world = ClutteredWorld::new();
    let config = PlannerConfig {
        propagate_failures: FailurePropagation::Immediately,
        ..PlannerConfig::default()
    };

    let (plan, metrics) = plan_world(&world, &config, 0).unwrap();

    let names: Vec<&str> = plan.iter().map(tamp_kernel::options::OptionValue::name).collect();
    assert_eq!(names, vec!["sweep", "pick"]);
    assert_eq!(metrics.num_failures_discovered, 1);
    assert_eq!(metrics.plan_length, 2);
    // Idempotence: once the marker precondition exists, the failing ground
    // operator is never attempted again while the obstacle is present.
    assert_eq!(world.blocked_pick_attempts(), 1);
}

#[test]
fn after_exhaust_defers_the_failure_until_backtracking_is_spent() {
    lock_tests::init_test_logging();
    let world = ClutteredWorld::new();
    let max_samples = 3;
    let config = PlannerConfig {
        propagate_failures: FailurePropagation::AfterExhaust,
        max_samples_per_step: max_samples,
        ..PlannerConfig::default()
    };

    let (plan, metrics) = plan_world(&world, &config, 0).unwrap();

    assert_eq!(plan.len(), 2);
    assert_eq!(metrics.num_failures_discovered, 1);
    // The doomed skeleton burned its full sample budget before the failure
    // was propagated.
    assert_eq!(world.blocked_pick_attempts(), max_samples as u64);
}

#[test]
fn never_mode_routes_around_without_touching_the_model() {
    lock_tests::init_test_logging();
    let world = ClutteredWorld::new();
    let max_samples = 4;
    let config = PlannerConfig {
        propagate_failures: FailurePropagation::Never,
        max_samples_per_step: max_samples,
        ..PlannerConfig::default()
    };

    let (plan, metrics) = plan_world(&world, &config, 0).unwrap();

    let names: Vec<&str> = plan.iter().map(tamp_kernel::options::OptionValue::name).collect();
    assert_eq!(names, vec!["sweep", "pick"]);
    assert_eq!(
        metrics.num_failures_discovered, 0,
        "never-propagation must not mutate the symbolic model"
    );
    // The doomed one-step skeleton was retried like any sampling failure.
    assert_eq!(world.blocked_pick_attempts(), max_samples as u64);
}
