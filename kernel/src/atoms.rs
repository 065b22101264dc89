//! Predicates and atoms: the symbolic vocabulary.
//!
//! A predicate's classifier is an externally supplied closure over the
//! continuous state. Equality, ordering, and hashing deliberately exclude
//! the classifier — two predicates with the same name and signature compare
//! equal even when re-derived with distinct closures, which is what lets
//! atom sets built at different times line up.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::state::State;
use crate::types::{get_object_combinations, Object, Type};

/// A boolean classifier over a continuous state and an object tuple.
pub type Classifier = Arc<dyn Fn(&State, &[Object]) -> bool + Send + Sync>;

/// A named relation over a fixed-arity tuple of types.
#[derive(Clone)]
pub struct Predicate {
    name: String,
    types: Vec<Arc<Type>>,
    classifier: Classifier,
}

impl Predicate {
    #[must_use]
    pub fn new(name: &str, types: Vec<Arc<Type>>, classifier: Classifier) -> Self {
        Self {
            name: name.to_string(),
            types,
            classifier,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn types(&self) -> &[Arc<Type>] {
        &self.types
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.types.len()
    }

    /// Evaluate the classifier on a concrete object tuple.
    #[must_use]
    pub fn holds(&self, state: &State, objects: &[Object]) -> bool {
        debug_assert_eq!(objects.len(), self.arity());
        (self.classifier)(state, objects)
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.types == other.types
    }
}

impl Eq for Predicate {}

impl PartialOrd for Predicate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Predicate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.types.cmp(&other.types))
    }
}

impl Hash for Predicate {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.name.hash(hasher);
        self.types.hash(hasher);
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A typed parameter variable, e.g. `?b:block`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable {
    name: String,
    ty: Arc<Type>,
}

impl Variable {
    #[must_use]
    pub fn new(name: &str, ty: &Arc<Type>) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.clone(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn ty(&self) -> &Arc<Type> {
        &self.ty
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty.name())
    }
}

/// A predicate applied to variables; the atoms operator templates are
/// written in.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LiftedAtom {
    predicate: Predicate,
    variables: Vec<Variable>,
}

impl LiftedAtom {
    #[must_use]
    pub fn new(predicate: Predicate, variables: Vec<Variable>) -> Self {
        debug_assert_eq!(variables.len(), predicate.arity());
        Self {
            predicate,
            variables,
        }
    }

    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }
}

impl fmt::Debug for LiftedAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.variables.iter().map(Variable::name).collect();
        write!(f, "{}({})", self.predicate.name, names.join(", "))
    }
}

/// A predicate applied to concrete objects. Immutable, hashable, used only
/// as a value.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroundAtom {
    predicate: Predicate,
    objects: Vec<Object>,
}

impl GroundAtom {
    #[must_use]
    pub fn new(predicate: Predicate, objects: Vec<Object>) -> Self {
        debug_assert_eq!(objects.len(), predicate.arity());
        Self { predicate, objects }
    }

    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Evaluate this atom's classifier against a continuous state.
    #[must_use]
    pub fn holds(&self, state: &State) -> bool {
        self.predicate.holds(state, &self.objects)
    }
}

impl fmt::Debug for GroundAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.objects.iter().map(Object::name).collect();
        write!(f, "{}({})", self.predicate.name, names.join(", "))
    }
}

/// The symbolic abstraction of a continuous state: every ground atom of the
/// active predicate set whose classifier accepts.
///
/// Object tuples are duplicate-free — a predicate is never evaluated with
/// the same object in two argument slots.
#[must_use]
pub fn abstract_state(state: &State, predicates: &BTreeSet<Predicate>) -> BTreeSet<GroundAtom> {
    let objects: Vec<Object> = state.objects().cloned().collect();
    let mut atoms = BTreeSet::new();
    for pred in predicates {
        for choice in get_object_combinations(&objects, pred.types(), false) {
            if pred.holds(state, &choice) {
                atoms.insert(GroundAtom::new(pred.clone(), choice));
            }
        }
    }
    atoms
}
