//! Ground-operator factory and delete-relaxation reachability filter.

use std::collections::BTreeSet;
use std::sync::Arc;

use tamp_kernel::atoms::GroundAtom;
use tamp_kernel::operators::{all_ground_operators, GroundOperator, Operator};
use tamp_kernel::types::Object;

use crate::config::Deadline;
use crate::error::PlanningError;

/// Ground every operator template over the object universe, in sorted
/// template order. Groundings with empty effects are kept here — the
/// restart loop re-filters them because recovery can give an empty-effect
/// operator a marker effect later.
///
/// # Errors
///
/// Returns [`PlanningError::GroundingTimeout`] when the deadline expires
/// mid-enumeration.
pub fn ground_all_operators(
    operators: &[Arc<Operator>],
    objects: &[Object],
    deadline: Deadline,
) -> Result<Vec<Arc<GroundOperator>>, PlanningError> {
    let mut sorted: Vec<&Arc<Operator>> = operators.iter().collect();
    sorted.sort();
    let mut ground_ops = Vec::new();
    for op in sorted {
        for ground in all_ground_operators(op, objects) {
            ground_ops.push(Arc::new(ground));
            if deadline.expired() {
                return Err(PlanningError::GroundingTimeout {
                    budget: deadline.budget(),
                });
            }
        }
    }
    Ok(ground_ops)
}

/// Monotone delete-relaxation fixpoint: the atoms that can ever become
/// true from `init_atoms`, ignoring delete-effects.
#[must_use]
pub fn reachable_atoms(
    ground_operators: &[Arc<GroundOperator>],
    init_atoms: &BTreeSet<GroundAtom>,
) -> BTreeSet<GroundAtom> {
    let mut reachables = init_atoms.clone();
    loop {
        let mut fixed_point = true;
        for op in ground_operators {
            if op.preconditions().is_subset(&reachables) {
                for atom in op.add_effects() {
                    if reachables.insert(atom.clone()) {
                        fixed_point = false;
                    }
                }
            }
        }
        if fixed_point {
            return reachables;
        }
    }
}

/// Drop groundings that cannot change the symbolic state, then drop
/// groundings whose preconditions are not entirely reachable.
#[must_use]
pub fn filter_reachable_operators(
    ground_operators: &[Arc<GroundOperator>],
    init_atoms: &BTreeSet<GroundAtom>,
) -> (Vec<Arc<GroundOperator>>, BTreeSet<GroundAtom>) {
    let nonempty: Vec<Arc<GroundOperator>> = ground_operators
        .iter()
        .filter(|op| op.has_effects())
        .cloned()
        .collect();
    let reachable = reachable_atoms(&nonempty, init_atoms);
    let reachable_ops = nonempty
        .into_iter()
        .filter(|op| op.preconditions().is_subset(&reachable))
        .collect();
    (reachable_ops, reachable)
}

/// Ground + filter in one call: the symbolic-planning-only entry point.
/// Returns the reachable ground operators and the reachable atom set; the
/// latter lets a caller decide goal reachability cheaply before building a
/// heuristic or a generator.
///
/// # Errors
///
/// Returns [`PlanningError::GroundingTimeout`] when the deadline expires
/// during grounding.
pub fn task_plan_grounding(
    init_atoms: &BTreeSet<GroundAtom>,
    objects: &[Object],
    operators: &[Arc<Operator>],
    deadline: Deadline,
) -> Result<(Vec<Arc<GroundOperator>>, BTreeSet<GroundAtom>), PlanningError> {
    let ground_ops = ground_all_operators(operators, objects, deadline)?;
    Ok(filter_reachable_operators(&ground_ops, init_atoms))
}
