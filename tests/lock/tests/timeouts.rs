//! Lock tests: timeouts are attributed to the phase that spent the clock.

use std::time::Duration;

use tamp_harness::contract::PlanningWorld;
use tamp_harness::runner::plan_world;
use tamp_harness::worlds::blocks::BlocksWorld;
use tamp_kernel::atoms::abstract_state;
use tamp_search::config::{Deadline, PlannerConfig};
use tamp_search::error::PlanningError;
use tamp_search::grounding::task_plan_grounding;
use tamp_search::heuristic::GoalCountHeuristic;
use tamp_search::planner::Metrics;
use tamp_search::skeleton::SkeletonGenerator;

#[test]
fn zero_budget_times_out_in_grounding() {
    lock_tests::init_test_logging();
    let world = BlocksWorld::new(3);
    let config = PlannerConfig {
        timeout: Duration::ZERO,
        ..PlannerConfig::default()
    };
    let err = plan_world(&world, &config, 0).unwrap_err();
    assert!(matches!(err, PlanningError::GroundingTimeout { .. }));
}

#[test]
fn skeleton_search_reports_its_own_timeout_kind() {
    lock_tests::init_test_logging();
    let world = BlocksWorld::new(3);
    let task = world.task();
    let init_atoms = abstract_state(&task.init, &world.predicates());

    // Ground under a generous budget, then hand the generator a spent one.
    let grounding_deadline = Deadline::starting_now(Duration::from_secs(10));
    let (ground_ops, _reachable) = task_plan_grounding(
        &init_atoms,
        &task.objects(),
        &world.operators(),
        grounding_deadline,
    )
    .unwrap();

    let heuristic = GoalCountHeuristic::new(task.goal.clone());
    let mut metrics = Metrics::default();
    let spent = Deadline::starting_now(Duration::ZERO);
    let mut generator = SkeletonGenerator::new(
        &task.goal,
        &ground_ops,
        init_atoms,
        &heuristic,
        0,
        spent,
        8,
        &mut metrics,
    );
    let err = generator.next_skeleton().unwrap_err();
    assert!(matches!(err, PlanningError::SkeletonSearchTimeout { .. }));
}
