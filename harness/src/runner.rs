//! Thin orchestration: wire a world into the planner.

use tamp_kernel::options::OptionValue;
use tamp_search::config::PlannerConfig;
use tamp_search::error::PlanningError;
use tamp_search::heuristic::GoalCountFactory;
use tamp_search::planner::{plan, Metrics};

use crate::contract::PlanningWorld;

/// Plan in `world` with the goal-count heuristic.
///
/// # Errors
///
/// Propagates the planner's [`PlanningError`] unchanged.
pub fn plan_world(
    world: &dyn PlanningWorld,
    config: &PlannerConfig,
    seed: u64,
) -> Result<(Vec<OptionValue>, Metrics), PlanningError> {
    plan(
        &world.task(),
        world.model(),
        &world.operators(),
        &world.predicates(),
        &GoalCountFactory,
        config,
        seed,
    )
}
