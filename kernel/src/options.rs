//! Options: the continuous primitives a plan is made of.
//!
//! A `ParameterizedOption` is a descriptor for an externally executed
//! continuous primitive; an `OptionValue` is that descriptor bound to
//! concrete objects and sampled continuous parameters. The planner never
//! executes an option — it only binds them and asks the external option
//! model for the resulting state.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;

use crate::atoms::GroundAtom;
use crate::state::State;
use crate::types::{Object, Type};

/// Initiation predicate for a bound option.
pub type InitiableFn = Arc<dyn Fn(&State, &[Object], &[f64]) -> bool + Send + Sync>;

/// A sampler producing continuous parameters for one operator application:
/// `(continuous state, goal, rng, ground objects) -> params`.
pub type Sampler =
    Arc<dyn Fn(&State, &BTreeSet<GroundAtom>, &mut StdRng, &[Object]) -> Vec<f64> + Send + Sync>;

/// Descriptor for a continuous primitive: name, object-parameter types, and
/// an initiation predicate.
#[derive(Clone)]
pub struct ParameterizedOption {
    name: String,
    types: Vec<Arc<Type>>,
    initiable: InitiableFn,
}

impl ParameterizedOption {
    #[must_use]
    pub fn new(name: &str, types: Vec<Arc<Type>>, initiable: InitiableFn) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            types,
            initiable,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn types(&self) -> &[Arc<Type>] {
        &self.types
    }
}

impl PartialEq for ParameterizedOption {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.types == other.types
    }
}

impl Eq for ParameterizedOption {}

impl PartialOrd for ParameterizedOption {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParameterizedOption {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.types.cmp(&other.types))
    }
}

impl fmt::Debug for ParameterizedOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A bound option: descriptor + objects + continuous parameters.
///
/// This is the plan element handed to the option model and, on success,
/// to the caller.
#[derive(Clone, PartialEq)]
pub struct OptionValue {
    parent: Arc<ParameterizedOption>,
    objects: Vec<Object>,
    params: Vec<f64>,
}

impl OptionValue {
    #[must_use]
    pub fn new(
        parent: Arc<ParameterizedOption>,
        objects: Vec<Object>,
        params: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(objects.len(), parent.types.len());
        Self {
            parent,
            objects,
            params,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.parent.name()
    }

    #[must_use]
    pub fn parent(&self) -> &Arc<ParameterizedOption> {
        &self.parent
    }

    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    #[must_use]
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Whether this option reports itself as executable from `state`.
    #[must_use]
    pub fn initiable(&self, state: &State) -> bool {
        (self.parent.initiable)(state, &self.objects, &self.params)
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.objects.iter().map(Object::name).collect();
        write!(f, "{}({})[{:?}]", self.parent.name, names.join(", "), self.params)
    }
}
