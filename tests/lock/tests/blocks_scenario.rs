//! Lock tests: the canonical 3-block stacking scenario.
//!
//! Solvable with pick-up and stack in exactly two steps; with pick-up's
//! `Holding` effect negated the same task must fail — fast when the
//! reachability check is on, by frontier exhaustion when it is off.

use tamp_harness::contract::PlanningWorld;
use tamp_harness::runner::plan_world;
use tamp_harness::worlds::blocks::BlocksWorld;
use tamp_kernel::atoms::abstract_state;
use tamp_search::config::PlannerConfig;
use tamp_search::error::PlanningError;

#[test]
fn three_block_stack_solves_in_two_steps() {
    lock_tests::init_test_logging();
    let world = BlocksWorld::new(3);
    let config = PlannerConfig::default();

    let (plan, metrics) = plan_world(&world, &config, 0).unwrap();

    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].name(), "pick");
    assert_eq!(plan[0].objects(), &[world.robot(), world.block(0)]);
    assert_eq!(plan[1].name(), "stack");
    assert_eq!(
        plan[1].objects(),
        &[world.robot(), world.block(0), world.block(1)]
    );
    assert_eq!(metrics.plan_length, 2);
    assert_eq!(metrics.num_skeletons_optimized, 1);
    assert_eq!(metrics.num_failures_discovered, 0);
}

/// Soundness: executing the returned plan through the option model reaches
/// a state whose abstraction is a superset of the goal.
#[test]
fn returned_plan_executes_to_a_goal_state() {
    lock_tests::init_test_logging();
    let world = BlocksWorld::new(3);
    let task = world.task();
    let (plan, _metrics) = plan_world(&world, &PlannerConfig::default(), 0).unwrap();

    let mut state = task.init.clone();
    for option in &plan {
        assert!(option.initiable(&state));
        state = world.model().next_state(&state, option).unwrap();
    }
    let final_atoms = abstract_state(&state, &world.predicates());
    assert!(task.goal.is_subset(&final_atoms));
}

#[test]
fn negated_effect_fails_fast_under_the_reachability_check() {
    lock_tests::init_test_logging();
    let world = BlocksWorld::with_negated_pick_effect(3);
    let err = plan_world(&world, &PlannerConfig::default(), 0).unwrap_err();
    assert!(matches!(err, PlanningError::GoalUnreachable { .. }));
}

#[test]
fn negated_effect_exhausts_the_frontier_without_the_check() {
    lock_tests::init_test_logging();
    let world = BlocksWorld::with_negated_pick_effect(3);
    let config = PlannerConfig {
        check_dr_reachable: false,
        ..PlannerConfig::default()
    };
    let err = plan_world(&world, &config, 0).unwrap_err();
    assert_eq!(err, PlanningError::SkeletonsExhausted);
}
