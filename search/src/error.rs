//! The typed failure taxonomy.
//!
//! Every exit path of the planner either returns a valid plan or one of
//! these kinds. Discovered failures are deliberately absent: they are an
//! internal signal ([`crate::backtrack::RefinementOutcome::Discovered`])
//! that the recovery loop always consumes.

use std::collections::BTreeSet;
use std::time::Duration;

use thiserror::Error;

use tamp_kernel::atoms::GroundAtom;

/// Typed planning failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanningError {
    /// The goal is not reachable under delete relaxation; raised before any
    /// search node is created.
    #[error("goal atoms {unreachable:?} are not delete-relaxation reachable")]
    GoalUnreachable {
        /// The goal atoms missing from the reachable set.
        unreachable: BTreeSet<GroundAtom>,
    },

    /// The symbolic frontier emptied before the goal was reached.
    #[error("skeleton search ran out of skeletons")]
    SkeletonsExhausted,

    /// The cap on goal-satisfying skeletons was hit.
    #[error("skeleton search reached the cap of {limit} optimized skeletons")]
    SkeletonLimitReached { limit: usize },

    /// The wall clock expired while grounding operators.
    #[error("planning timed out in grounding (budget {budget:?})")]
    GroundingTimeout { budget: Duration },

    /// The wall clock expired during skeleton search.
    #[error("planning timed out in skeleton search (budget {budget:?})")]
    SkeletonSearchTimeout { budget: Duration },

    /// The wall clock expired during low-level backtracking.
    #[error("planning timed out in backtracking (budget {budget:?})")]
    LowLevelTimeout { budget: Duration },
}
