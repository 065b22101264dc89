//! The bilevel planning entry point and its failure-recovery loop.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use tamp_kernel::atoms::{abstract_state, Predicate};
use tamp_kernel::operators::{extract_preds_and_types, Operator};
use tamp_kernel::options::OptionValue;
use tamp_kernel::task::Task;

use crate::backtrack::{run_low_level_search, RefinementOutcome};
use crate::config::{Deadline, PlannerConfig};
use crate::contract::OptionModel;
use crate::error::PlanningError;
use crate::grounding::{filter_reachable_operators, ground_all_operators};
use crate::heuristic::HeuristicFactory;
use crate::recovery::update_operators_with_failure;
use crate::skeleton::SkeletonGenerator;

/// Counters accumulated across one planning call, including every restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub num_skeletons_optimized: u64,
    pub num_nodes_expanded: u64,
    pub num_failures_discovered: u64,
    pub plan_length: u64,
}

/// Run bilevel search-and-sample planning.
///
/// Grounds the operator library once, then interleaves best-first skeleton
/// search with continuous refinement, restarting the whole pipeline (with
/// a rewritten ground-operator set and an advanced seed) each time the
/// continuous layer discovers a structural failure.
///
/// Returns the ordered bound options and the run's metrics.
///
/// # Errors
///
/// One of the [`PlanningError`] kinds: goal unreachability, skeleton
/// exhaustion or cap, or a phase-attributed timeout.
pub fn plan(
    task: &Task,
    option_model: &dyn OptionModel,
    operators: &[Arc<Operator>],
    initial_predicates: &BTreeSet<Predicate>,
    heuristic_factory: &dyn HeuristicFactory,
    config: &PlannerConfig,
    seed: u64,
) -> Result<(Vec<OptionValue>, Metrics), PlanningError> {
    let deadline = Deadline::starting_now(config.timeout);

    // The active predicate set always includes everything the operator
    // library mentions.
    let (operator_preds, _types) = extract_preds_and_types(operators);
    let mut predicates: BTreeSet<Predicate> = initial_predicates.clone();
    predicates.extend(operator_preds.into_values());

    let init_atoms = abstract_state(&task.init, &predicates);
    let objects = task.objects();
    let mut ground_ops = ground_all_operators(operators, &objects, deadline)?;
    let mut metrics = Metrics::default();

    // Restart while the continuous layer keeps discovering failures.
    loop {
        // Re-filter inside the loop: recovery can give a previously
        // empty-effect grounding a marker effect, and markers shift what
        // is reachable.
        let (reachable_ops, reachable) = filter_reachable_operators(&ground_ops, &init_atoms);
        if config.check_dr_reachable && !task.goal.is_subset(&reachable) {
            let unreachable = task.goal.difference(&reachable).cloned().collect();
            return Err(PlanningError::GoalUnreachable { unreachable });
        }
        let heuristic = heuristic_factory.build(
            &init_atoms,
            &task.goal,
            &reachable_ops,
            &predicates,
            &objects,
        );
        let restart_seed = seed + metrics.num_failures_discovered;
        let mut generator = SkeletonGenerator::new(
            &task.goal,
            &reachable_ops,
            init_atoms.clone(),
            heuristic.as_ref(),
            restart_seed,
            deadline,
            config.max_skeletons_optimized,
            &mut metrics,
        );

        let discovered = loop {
            let candidate = generator.next_skeleton()?;
            match run_low_level_search(
                task,
                option_model,
                &candidate.skeleton,
                &candidate.atoms_sequence,
                restart_seed,
                deadline,
                config,
            )? {
                RefinementOutcome::Succeeded(result) => {
                    drop(generator);
                    metrics.plan_length = result.len() as u64;
                    log::info!(
                        "planning succeeded: plan of length {} after {} skeletons, {} failures discovered",
                        metrics.plan_length,
                        metrics.num_skeletons_optimized,
                        metrics.num_failures_discovered
                    );
                    return Ok((result, metrics));
                }
                RefinementOutcome::Failed => {}
                RefinementOutcome::Discovered(failure) => break failure,
            }
        };

        drop(generator);
        metrics.num_failures_discovered += 1;
        log::debug!(
            "discovered failure #{} on {:?}; restarting",
            metrics.num_failures_discovered,
            discovered.failing_operator
        );
        let (new_predicates, new_ops) =
            update_operators_with_failure(&discovered, &ground_ops);
        predicates.extend(new_predicates);
        ground_ops = new_ops;
    }
}
