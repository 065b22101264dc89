//! Restartable best-first search over skeletons (ground operator
//! sequences).
//!
//! The generator owns its frontier, so pulling the next candidate resumes
//! the search exactly where the previous pull left off — nothing is
//! re-derived between pulls. The caller interleaves symbolic enumeration
//! with continuous verification by pulling, attempting refinement, and
//! pulling again on rejection.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tamp_kernel::atoms::GroundAtom;
use tamp_kernel::operators::{apply_operator, get_applicable_operators, GroundOperator};

use crate::config::Deadline;
use crate::error::PlanningError;
use crate::frontier::{FrontierKey, SkeletonFrontier};
use crate::heuristic::TaskHeuristic;
use crate::planner::Metrics;

/// A node in the skeleton search.
///
/// `atoms_sequence[i]` is the symbolic state expected to hold after the
/// first `i` operators of `skeleton`; its length is always
/// `skeleton.len() + 1`. The parent id exists only for trace
/// reconstruction — the skeleton list itself is carried forward whole.
#[derive(Debug, Clone)]
pub struct SkeletonNode {
    pub node_id: u64,
    pub parent_id: Option<u64>,
    pub atoms: BTreeSet<GroundAtom>,
    pub skeleton: Vec<Arc<GroundOperator>>,
    pub atoms_sequence: Vec<BTreeSet<GroundAtom>>,
}

/// A goal-satisfying skeleton together with its expected atom sequence.
#[derive(Debug, Clone)]
pub struct SkeletonCandidate {
    pub skeleton: Vec<Arc<GroundOperator>>,
    pub atoms_sequence: Vec<BTreeSet<GroundAtom>>,
}

/// Lazy best-first generator of goal-satisfying skeletons.
pub struct SkeletonGenerator<'a> {
    goal: &'a BTreeSet<GroundAtom>,
    ground_operators: &'a [Arc<GroundOperator>],
    heuristic: &'a dyn TaskHeuristic,
    frontier: SkeletonFrontier,
    rng: StdRng,
    deadline: Deadline,
    max_skeletons: usize,
    metrics: &'a mut Metrics,
    next_node_id: u64,
}

impl<'a> SkeletonGenerator<'a> {
    /// Seed the frontier with the root node (empty skeleton at the initial
    /// abstraction).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        goal: &'a BTreeSet<GroundAtom>,
        ground_operators: &'a [Arc<GroundOperator>],
        init_atoms: BTreeSet<GroundAtom>,
        heuristic: &'a dyn TaskHeuristic,
        seed: u64,
        deadline: Deadline,
        max_skeletons: usize,
        metrics: &'a mut Metrics,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut frontier = SkeletonFrontier::new();
        let root = SkeletonNode {
            node_id: 0,
            parent_id: None,
            atoms: init_atoms.clone(),
            skeleton: Vec::new(),
            atoms_sequence: vec![init_atoms],
        };
        let key = FrontierKey {
            priority: heuristic.estimate(&root.atoms),
            tie: rng.gen(),
        };
        frontier.push(key, root);
        Self {
            goal,
            ground_operators,
            heuristic,
            frontier,
            rng,
            deadline,
            max_skeletons,
            metrics,
            next_node_id: 1,
        }
    }

    /// Pop nodes best-first until one satisfies the goal, expanding the
    /// rest, and return it as a candidate. The frontier survives the call;
    /// pulling again continues the same search.
    ///
    /// # Errors
    ///
    /// - [`PlanningError::SkeletonsExhausted`] when the frontier empties.
    /// - [`PlanningError::SkeletonLimitReached`] once `max_skeletons`
    ///   candidates have been yielded.
    /// - [`PlanningError::SkeletonSearchTimeout`] when the deadline expires.
    #[allow(clippy::cast_precision_loss)]
    pub fn next_skeleton(&mut self) -> Result<SkeletonCandidate, PlanningError> {
        loop {
            if self.frontier.is_empty() {
                return Err(PlanningError::SkeletonsExhausted);
            }
            if self.deadline.expired() {
                return Err(PlanningError::SkeletonSearchTimeout {
                    budget: self.deadline.budget(),
                });
            }
            if self.metrics.num_skeletons_optimized == self.max_skeletons as u64 {
                return Err(PlanningError::SkeletonLimitReached {
                    limit: self.max_skeletons,
                });
            }
            let Some(node) = self.frontier.pop() else {
                return Err(PlanningError::SkeletonsExhausted);
            };
            if self.goal.is_subset(&node.atoms) {
                self.metrics.num_skeletons_optimized += 1;
                log::debug!(
                    "yielding skeleton {} of length {}",
                    self.metrics.num_skeletons_optimized,
                    node.skeleton.len()
                );
                return Ok(SkeletonCandidate {
                    skeleton: node.skeleton,
                    atoms_sequence: node.atoms_sequence,
                });
            }
            self.metrics.num_nodes_expanded += 1;
            for op in get_applicable_operators(self.ground_operators, &node.atoms) {
                let child_atoms = apply_operator(op, &node.atoms);
                let mut skeleton = node.skeleton.clone();
                skeleton.push(op.clone());
                let mut atoms_sequence = node.atoms_sequence.clone();
                atoms_sequence.push(child_atoms.clone());
                let priority =
                    skeleton.len() as f64 + self.heuristic.estimate(&child_atoms);
                let child = SkeletonNode {
                    node_id: self.next_node_id,
                    parent_id: Some(node.node_id),
                    atoms: child_atoms,
                    skeleton,
                    atoms_sequence,
                };
                self.next_node_id += 1;
                let key = FrontierKey {
                    priority,
                    tie: self.rng.gen(),
                };
                self.frontier.push(key, child);
            }
        }
    }
}
