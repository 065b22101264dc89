//! World fixture contract.

use std::collections::BTreeSet;
use std::sync::Arc;

use tamp_kernel::atoms::Predicate;
use tamp_kernel::operators::Operator;
use tamp_kernel::task::Task;
use tamp_search::contract::OptionModel;

/// Trait for worlds the runner can plan in.
///
/// # Contract
///
/// - `operators`, `predicates`, and `task` must be deterministic: same
///   world value → same data on every call.
/// - The returned option model must be deterministic per
///   [`OptionModel`]'s own contract.
pub trait PlanningWorld {
    /// Unique world identifier.
    fn world_id(&self) -> &str;

    /// The operator library.
    fn operators(&self) -> Vec<Arc<Operator>>;

    /// The predicates the goal is expressed in (the planner completes the
    /// set from the operator library itself).
    fn predicates(&self) -> BTreeSet<Predicate>;

    /// The planning task.
    fn task(&self) -> Task;

    /// The simulated continuous-transition model.
    fn model(&self) -> &dyn OptionModel;
}
