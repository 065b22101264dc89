//! Heuristic contracts and the goal-count default.

use std::collections::BTreeSet;
use std::sync::Arc;

use tamp_kernel::atoms::{GroundAtom, Predicate};
use tamp_kernel::operators::GroundOperator;
use tamp_kernel::types::Object;

/// A symbolic-state cost estimator. Estimates must be non-negative and
/// finite; the skeleton search orders its frontier by
/// `skeleton length + estimate`.
pub trait TaskHeuristic {
    fn estimate(&self, atoms: &BTreeSet<GroundAtom>) -> f64;
}

/// Builds a heuristic for one restart of the pipeline. Rebuilt after every
/// discovered failure because the reachable operator and predicate sets
/// change under recovery.
pub trait HeuristicFactory {
    fn build(
        &self,
        init_atoms: &BTreeSet<GroundAtom>,
        goal: &BTreeSet<GroundAtom>,
        ground_operators: &[Arc<GroundOperator>],
        predicates: &BTreeSet<Predicate>,
        objects: &[Object],
    ) -> Box<dyn TaskHeuristic>;
}

/// Counts the goal atoms not yet satisfied.
pub struct GoalCountHeuristic {
    goal: BTreeSet<GroundAtom>,
}

impl GoalCountHeuristic {
    #[must_use]
    pub fn new(goal: BTreeSet<GroundAtom>) -> Self {
        Self { goal }
    }
}

impl TaskHeuristic for GoalCountHeuristic {
    #[allow(clippy::cast_precision_loss)]
    fn estimate(&self, atoms: &BTreeSet<GroundAtom>) -> f64 {
        self.goal.difference(atoms).count() as f64
    }
}

/// Factory for [`GoalCountHeuristic`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalCountFactory;

impl HeuristicFactory for GoalCountFactory {
    fn build(
        &self,
        _init_atoms: &BTreeSet<GroundAtom>,
        goal: &BTreeSet<GroundAtom>,
        _ground_operators: &[Arc<GroundOperator>],
        _predicates: &BTreeSet<Predicate>,
        _objects: &[Object],
    ) -> Box<dyn TaskHeuristic> {
        Box::new(GoalCountHeuristic::new(goal.clone()))
    }
}
