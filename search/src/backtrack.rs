//! Low-level search: bounded randomized backtracking over continuous
//! parameter samples for one fixed skeleton.
//!
//! Depth-first over a fixed-length decision sequence with bounded retries
//! per position. Rollback is full-state rather than delta-based: a failed
//! step's trajectory slot is simply dropped and regenerated from the
//! sampler, which keeps correctness under resampling easy to reason about.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use tamp_kernel::atoms::GroundAtom;
use tamp_kernel::operators::GroundOperator;
use tamp_kernel::options::OptionValue;
use tamp_kernel::state::State;
use tamp_kernel::task::Task;

use crate::config::{Deadline, FailurePropagation, PlannerConfig};
use crate::contract::OptionModel;
use crate::error::PlanningError;
use crate::recovery::{DiscoveredFailure, NOT_CAUSES_FAILURE};

/// How a refinement attempt ended.
///
/// `Failed` is recovered locally (the caller pulls the next skeleton);
/// `Discovered` aborts the pipeline and triggers recovery.
#[derive(Debug)]
pub enum RefinementOutcome {
    /// Every skeleton step was realized; the plan is complete.
    Succeeded(Vec<OptionValue>),
    /// Backtracking exhausted the skeleton without a plan.
    Failed,
    /// A structural failure must be propagated to the recovery loop.
    Discovered(DiscoveredFailure),
}

/// Try to realize `skeleton` as a sequence of bound options.
///
/// `atoms_sequence` must be the skeleton's expected atom sequence
/// (`skeleton.len() + 1` entries). The expected atoms at each step are the
/// ones that definitely must hold — not all atoms that could hold — and
/// marker atoms ([`NOT_CAUSES_FAILURE`]) are never recomputed from the
/// continuous state, so they are skipped.
///
/// # Errors
///
/// Returns [`PlanningError::LowLevelTimeout`] when the deadline expires
/// between samples.
pub fn run_low_level_search(
    task: &Task,
    option_model: &dyn OptionModel,
    skeleton: &[Arc<GroundOperator>],
    atoms_sequence: &[BTreeSet<GroundAtom>],
    seed: u64,
    deadline: Deadline,
    config: &PlannerConfig,
) -> Result<RefinementOutcome, PlanningError> {
    debug_assert_eq!(atoms_sequence.len(), skeleton.len() + 1);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cur_idx = 0;
    let mut num_tries = vec![0usize; skeleton.len()];
    let mut plan: Vec<Option<OptionValue>> = vec![None; skeleton.len()];
    let mut traj: Vec<Option<State>> = vec![None; skeleton.len() + 1];
    traj[0] = Some(task.init.clone());
    // At most one remembered failure per step: resampling a step renders
    // its previous discovered failure obsolete.
    let mut discovered: Vec<Option<DiscoveredFailure>> = vec![None; skeleton.len()];

    while cur_idx < skeleton.len() {
        if deadline.expired() {
            return Err(PlanningError::LowLevelTimeout {
                budget: deadline.budget(),
            });
        }
        debug_assert!(num_tries[cur_idx] < config.max_samples_per_step);
        num_tries[cur_idx] += 1;
        let Some(state) = traj[cur_idx].clone() else {
            unreachable!("trajectory entry {cur_idx} is set before it is current")
        };
        let operator = &skeleton[cur_idx];
        let option = operator.sample_option(&state, &task.goal, &mut rng);
        plan[cur_idx] = Some(option.clone());

        let mut step_ok = false;
        if option.initiable(&state) {
            match option_model.next_state(&state, &option) {
                Ok(next_state) => {
                    discovered[cur_idx] = None;
                    let expected = &atoms_sequence[cur_idx + 1];
                    let holds = expected
                        .iter()
                        .filter(|atom| atom.predicate().name() != NOT_CAUSES_FAILURE)
                        .all(|atom| atom.holds(&next_state));
                    traj[cur_idx + 1] = Some(next_state);
                    if holds {
                        cur_idx += 1;
                        if cur_idx == skeleton.len() {
                            return Ok(RefinementOutcome::Succeeded(
                                plan.into_iter().flatten().collect(),
                            ));
                        }
                        step_ok = true;
                    }
                }
                Err(env_failure) => {
                    let failure = DiscoveredFailure::new(env_failure, operator.clone());
                    if config.propagate_failures == FailurePropagation::Immediately {
                        return Ok(RefinementOutcome::Discovered(failure));
                    }
                    discovered[cur_idx] = Some(failure);
                }
            }
        }

        if !step_ok {
            // Re-do the step just attempted; backtrack through every step
            // whose sample budget is spent.
            while num_tries[cur_idx] == config.max_samples_per_step {
                num_tries[cur_idx] = 0;
                plan[cur_idx] = None;
                traj[cur_idx + 1] = None;
                if cur_idx == 0 {
                    // Backtracking exhausted. Surface the earliest
                    // remembered failure if the policy defers to this
                    // point; otherwise let the caller try the next
                    // skeleton.
                    if config.propagate_failures == FailurePropagation::AfterExhaust {
                        if let Some(failure) = discovered.iter().flatten().next() {
                            return Ok(RefinementOutcome::Discovered(failure.clone()));
                        }
                    }
                    return Ok(RefinementOutcome::Failed);
                }
                cur_idx -= 1;
            }
        }
    }

    // Only an empty skeleton reaches here: it refines to an empty plan.
    debug_assert!(skeleton.is_empty());
    Ok(RefinementOutcome::Succeeded(Vec::new()))
}
