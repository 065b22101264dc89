//! External continuous-transition model contract.

use std::collections::BTreeSet;
use std::fmt;

use tamp_kernel::options::OptionValue;
use tamp_kernel::state::State;
use tamp_kernel::types::Object;

/// A structural failure reported by the option model: the named objects
/// made the transition physically infeasible even though the symbolic
/// preconditions held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFailure {
    offending_objects: BTreeSet<Object>,
}

impl EnvFailure {
    #[must_use]
    pub fn new(offending_objects: BTreeSet<Object>) -> Self {
        Self { offending_objects }
    }

    #[must_use]
    pub fn offending_objects(&self) -> &BTreeSet<Object> {
        &self.offending_objects
    }
}

impl fmt::Display for EnvFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "environment failure on {:?}", self.offending_objects)
    }
}

/// Trait for the external continuous-transition model.
///
/// # Contract
///
/// - `next_state` must be deterministic: same `(state, option)` → same
///   result. The planner's reproducibility guarantee depends on it.
/// - A returned [`EnvFailure`] means the transition is structurally
///   infeasible because of the named objects; a model that cannot attribute
///   a failure to objects should instead return a state that simply does
///   not satisfy the expected atoms, which the planner treats as an
///   ordinary sampling failure.
/// - Initiation is queried on the bound option itself
///   ([`OptionValue::initiable`]) before `next_state` is ever called.
pub trait OptionModel {
    /// Execute `option` from `state` and return the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`EnvFailure`] when the transition is structurally
    /// infeasible, naming the offending objects.
    fn next_state(&self, state: &State, option: &OptionValue) -> Result<State, EnvFailure>;
}
