//! Planner configuration and time budgeting.

use std::time::{Duration, Instant};

use serde::Serialize;

/// When a discovered failure surfaces out of the low-level search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailurePropagation {
    /// Abort the current skeleton at the failing step and trigger recovery.
    Immediately,
    /// Keep backtracking; if the skeleton is exhausted, surface the
    /// earliest step's failure.
    AfterExhaust,
    /// Treat failures as ordinary sampling failures; never trigger recovery.
    Never,
}

/// Immutable planner configuration, threaded explicitly through every
/// component.
#[derive(Debug, Clone, Serialize)]
pub struct PlannerConfig {
    /// Single wall-clock budget shared by grounding, skeleton search, and
    /// low-level search.
    pub timeout: Duration,
    /// Hard cap on goal-satisfying skeletons yielded per restart.
    pub max_skeletons_optimized: usize,
    /// Sampler retries per skeleton step before backtracking.
    pub max_samples_per_step: usize,
    /// Discovered-failure propagation mode.
    pub propagate_failures: FailurePropagation,
    /// Fail fast when the goal is not delete-relaxation reachable.
    pub check_dr_reachable: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_skeletons_optimized: 8,
            max_samples_per_step: 10,
            propagate_failures: FailurePropagation::AfterExhaust,
            check_dr_reachable: true,
        }
    }
}

/// A wall-clock deadline. Each phase checks it at natural loop boundaries
/// (before popping a node, before retrying a sample) and raises its own
/// timeout kind.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    #[must_use]
    pub fn starting_now(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    #[must_use]
    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.budget
    }

    /// The total budget this deadline was created with.
    #[must_use]
    pub fn budget(&self) -> Duration {
        self.budget
    }
}
