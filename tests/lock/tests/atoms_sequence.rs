//! Lock tests: the atom-sequence invariant of every yielded skeleton.
//!
//! For any candidate, `atoms_sequence` has `skeleton.len() + 1` entries,
//! entry 0 is the initial abstraction, and each later entry is exactly the
//! delete/add application of its predecessor.

use std::time::Duration;

use tamp_harness::contract::PlanningWorld;
use tamp_harness::worlds::blocks::BlocksWorld;
use tamp_harness::worlds::cluttered::ClutteredWorld;
use tamp_kernel::atoms::abstract_state;
use tamp_kernel::operators::apply_operator;
use tamp_search::config::Deadline;
use tamp_search::error::PlanningError;
use tamp_search::grounding::task_plan_grounding;
use tamp_search::heuristic::GoalCountHeuristic;
use tamp_search::planner::Metrics;
use tamp_search::skeleton::{SkeletonCandidate, SkeletonGenerator};

fn check_invariant(candidate: &SkeletonCandidate, init_atoms: &std::collections::BTreeSet<tamp_kernel::atoms::GroundAtom>) {
    assert_eq!(
        candidate.atoms_sequence.len(),
        candidate.skeleton.len() + 1,
        "sequence must have one more entry than the skeleton"
    );
    assert_eq!(&candidate.atoms_sequence[0], init_atoms);
    for (idx, op) in candidate.skeleton.iter().enumerate() {
        let expected = apply_operator(op, &candidate.atoms_sequence[idx]);
        assert_eq!(
            candidate.atoms_sequence[idx + 1],
            expected,
            "entry {} must be the application of {:?} to entry {}",
            idx + 1,
            op,
            idx
        );
    }
}

/// Three blocks admit exactly two goal-reaching skeletons (the direct
/// 2-step stack, and a 4-step detour that first stacks b1 onto b2); goal
/// nodes are yielded, never expanded, so no longer variants exist and the
/// frontier then empties.
#[test]
fn blocks_skeletons_satisfy_the_sequence_invariant_then_exhaust() {
    lock_tests::init_test_logging();
    let world = BlocksWorld::new(3);
    let task = world.task();
    let init_atoms = abstract_state(&task.init, &world.predicates());
    let deadline = Deadline::starting_now(Duration::from_secs(10));

    let (ground_ops, _reachable) =
        task_plan_grounding(&init_atoms, &task.objects(), &world.operators(), deadline).unwrap();
    let heuristic = GoalCountHeuristic::new(task.goal.clone());
    let mut metrics = Metrics::default();
    let mut generator = SkeletonGenerator::new(
        &task.goal,
        &ground_ops,
        init_atoms.clone(),
        &heuristic,
        0,
        deadline,
        8,
        &mut metrics,
    );

    let mut lengths = Vec::new();
    loop {
        match generator.next_skeleton() {
            Ok(candidate) => {
                check_invariant(&candidate, &init_atoms);
                assert!(task.goal.is_subset(candidate.atoms_sequence.last().unwrap()));
                lengths.push(candidate.skeleton.len());
            }
            Err(err) => {
                assert_eq!(err, PlanningError::SkeletonsExhausted);
                break;
            }
        }
    }
    assert_eq!(lengths, vec![2, 4]);
}

/// The cluttered world admits arbitrarily many goal-reaching skeletons
/// (sweeping is always applicable and atom sets are never deduplicated),
/// so the generator keeps resuming its frontier until the cap.
#[test]
fn resumed_generator_yields_distinct_valid_skeletons_up_to_the_cap() {
    lock_tests::init_test_logging();
    let world = ClutteredWorld::new();
    let task = world.task();
    let init_atoms = abstract_state(&task.init, &world.predicates());
    let deadline = Deadline::starting_now(Duration::from_secs(10));

    let (ground_ops, _reachable) =
        task_plan_grounding(&init_atoms, &task.objects(), &world.operators(), deadline).unwrap();
    let heuristic = GoalCountHeuristic::new(task.goal.clone());
    let mut metrics = Metrics::default();
    let max_skeletons = 5;
    let mut generator = SkeletonGenerator::new(
        &task.goal,
        &ground_ops,
        init_atoms.clone(),
        &heuristic,
        0,
        deadline,
        max_skeletons,
        &mut metrics,
    );

    let mut lengths = Vec::new();
    for _ in 0..max_skeletons {
        let candidate = generator.next_skeleton().unwrap();
        check_invariant(&candidate, &init_atoms);
        assert!(task.goal.is_subset(candidate.atoms_sequence.last().unwrap()));
        lengths.push(candidate.skeleton.len());
    }
    assert_eq!(
        generator.next_skeleton().unwrap_err(),
        PlanningError::SkeletonLimitReached {
            limit: max_skeletons
        }
    );

    assert_eq!(metrics.num_skeletons_optimized, max_skeletons as u64);
    assert!(
        lengths.windows(2).all(|pair| pair[0] <= pair[1]),
        "best-first yields skeletons in nondecreasing length order here: {lengths:?}"
    );
}
