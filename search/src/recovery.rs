//! Discovered-failure records and the model rewrite that consumes them.
//!
//! When the option model reports a structural infeasibility, the symbolic
//! model was too optimistic. Recovery plants an always-false marker
//! predicate per offending object: as a precondition of the failing ground
//! operator (so that exact step is never retried verbatim) and as an
//! add-effect of every other ground operator mentioning the object (so any
//! operator that could plausibly move past the object propagates the
//! marker forward).

use std::collections::BTreeSet;
use std::sync::Arc;

use tamp_kernel::atoms::{GroundAtom, Predicate};
use tamp_kernel::operators::GroundOperator;

use crate::contract::EnvFailure;

/// Name of the planning-time marker predicate. Always false under normal
/// abstraction; it exists only inside the ground-operator set, so the
/// low-level search skips it when validating expected atoms.
pub const NOT_CAUSES_FAILURE: &str = "NotCausesFailure";

/// A failure discovered by the low-level search: the environment report
/// plus the ground operator being attempted when it occurred. Created once
/// per failure event and consumed exactly once by the recovery pass.
#[derive(Debug, Clone)]
pub struct DiscoveredFailure {
    pub env_failure: EnvFailure,
    pub failing_operator: Arc<GroundOperator>,
}

impl DiscoveredFailure {
    #[must_use]
    pub fn new(env_failure: EnvFailure, failing_operator: Arc<GroundOperator>) -> Self {
        Self {
            env_failure,
            failing_operator,
        }
    }
}

/// Rewrite the ground-operator set for one discovered failure.
///
/// Returns the synthesized marker predicates and a replacement operator
/// list of the same length. Multiple offending objects fold cumulatively:
/// each object's markers are applied to the already-rewritten list.
#[must_use]
pub fn update_operators_with_failure(
    failure: &DiscoveredFailure,
    ground_operators: &[Arc<GroundOperator>],
) -> (BTreeSet<Predicate>, Vec<Arc<GroundOperator>>) {
    let mut new_predicates = BTreeSet::new();
    let mut operators: Vec<Arc<GroundOperator>> = ground_operators.to_vec();
    for obj in failure.env_failure.offending_objects() {
        let pred = Predicate::new(
            NOT_CAUSES_FAILURE,
            vec![obj.ty().clone()],
            Arc::new(|_, _| false),
        );
        let atom = GroundAtom::new(pred.clone(), vec![obj.clone()]);
        new_predicates.insert(pred);
        operators = operators
            .iter()
            .map(|op| {
                if **op == *failure.failing_operator {
                    let mut preconditions = op.preconditions().clone();
                    preconditions.insert(atom.clone());
                    Arc::new(op.with_preconditions(preconditions))
                } else if op.objects().contains(obj) {
                    // The failing operator's own effects could never be
                    // used to satisfy its new precondition, hence the
                    // else-branch.
                    let mut add_effects = op.add_effects().clone();
                    add_effects.insert(atom.clone());
                    Arc::new(op.with_add_effects(add_effects))
                } else {
                    op.clone()
                }
            })
            .collect();
    }
    (new_predicates, operators)
}
