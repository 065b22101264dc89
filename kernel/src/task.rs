//! Planning tasks.

use std::collections::BTreeSet;

use crate::atoms::GroundAtom;
use crate::state::State;
use crate::types::Object;

/// A planning task: an initial continuous state and a symbolic goal.
#[derive(Debug, Clone)]
pub struct Task {
    pub init: State,
    pub goal: BTreeSet<GroundAtom>,
}

impl Task {
    #[must_use]
    pub fn new(init: State, goal: BTreeSet<GroundAtom>) -> Self {
        Self { init, goal }
    }

    /// The object universe of this task (the objects of the initial state).
    #[must_use]
    pub fn objects(&self) -> Vec<Object> {
        self.init.objects().cloned().collect()
    }
}
