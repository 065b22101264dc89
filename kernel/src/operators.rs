//! Operator templates, ground operators, grounding, and symbolic
//! application.
//!
//! A ground operator's equality, ordering, and hashing are structural on
//! (name, object substitution), which is what lets ground operators serve
//! as search edges and map keys. The atom sets and the sampler ride along
//! but take no part in identity.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rand::rngs::StdRng;

use crate::atoms::{GroundAtom, LiftedAtom, Predicate, Variable};
use crate::options::{OptionValue, ParameterizedOption, Sampler};
use crate::state::State;
use crate::types::{get_object_combinations, Object, Type};

/// A parameterized symbolic action template bound to a continuous
/// primitive and a sampler.
#[derive(Clone)]
pub struct Operator {
    name: String,
    parameters: Vec<Variable>,
    preconditions: BTreeSet<LiftedAtom>,
    add_effects: BTreeSet<LiftedAtom>,
    delete_effects: BTreeSet<LiftedAtom>,
    option: Arc<ParameterizedOption>,
    option_arg_indices: Vec<usize>,
    sampler: Sampler,
}

impl Operator {
    /// Build an operator template.
    ///
    /// `option_vars` maps the option's object parameters onto this
    /// operator's parameter list; every entry must name a parameter.
    ///
    /// # Panics
    ///
    /// Panics if an `option_vars` entry is not one of `parameters` — that
    /// is a malformed operator library, not a planning-time condition.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        parameters: Vec<Variable>,
        preconditions: BTreeSet<LiftedAtom>,
        add_effects: BTreeSet<LiftedAtom>,
        delete_effects: BTreeSet<LiftedAtom>,
        option: Arc<ParameterizedOption>,
        option_vars: &[Variable],
        sampler: Sampler,
    ) -> Arc<Self> {
        let option_arg_indices = option_vars
            .iter()
            .map(|var| {
                parameters
                    .iter()
                    .position(|param| param == var)
                    .unwrap_or_else(|| {
                        panic!("option variable {var:?} is not a parameter of operator {name}")
                    })
            })
            .collect();
        Arc::new(Self {
            name: name.to_string(),
            parameters,
            preconditions,
            add_effects,
            delete_effects,
            option,
            option_arg_indices,
            sampler,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parameters(&self) -> &[Variable] {
        &self.parameters
    }

    #[must_use]
    pub fn preconditions(&self) -> &BTreeSet<LiftedAtom> {
        &self.preconditions
    }

    #[must_use]
    pub fn add_effects(&self) -> &BTreeSet<LiftedAtom> {
        &self.add_effects
    }

    #[must_use]
    pub fn delete_effects(&self) -> &BTreeSet<LiftedAtom> {
        &self.delete_effects
    }

    /// Substitute `objects` for this operator's parameters.
    #[must_use]
    pub fn ground(&self, objects: Vec<Object>) -> GroundOperator {
        debug_assert_eq!(objects.len(), self.parameters.len());
        let sub: BTreeMap<&Variable, &Object> =
            self.parameters.iter().zip(objects.iter()).collect();
        let ground_set = |atoms: &BTreeSet<LiftedAtom>| {
            atoms
                .iter()
                .map(|atom| {
                    let objs = atom
                        .variables()
                        .iter()
                        .map(|var| (*sub[var]).clone())
                        .collect();
                    GroundAtom::new(atom.predicate().clone(), objs)
                })
                .collect()
        };
        let preconditions = ground_set(&self.preconditions);
        let add_effects = ground_set(&self.add_effects);
        let delete_effects = ground_set(&self.delete_effects);
        let option_objects = self
            .option_arg_indices
            .iter()
            .map(|&idx| objects[idx].clone())
            .collect();
        GroundOperator {
            name: self.name.clone(),
            objects,
            preconditions,
            add_effects,
            delete_effects,
            option: self.option.clone(),
            option_objects,
            sampler: self.sampler.clone(),
        }
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Operator {}

impl PartialOrd for Operator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Operator {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.name, self.parameters)
    }
}

/// An operator template under a total object substitution.
#[derive(Clone)]
pub struct GroundOperator {
    name: String,
    objects: Vec<Object>,
    preconditions: BTreeSet<GroundAtom>,
    add_effects: BTreeSet<GroundAtom>,
    delete_effects: BTreeSet<GroundAtom>,
    option: Arc<ParameterizedOption>,
    option_objects: Vec<Object>,
    sampler: Sampler,
}

impl GroundOperator {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    #[must_use]
    pub fn preconditions(&self) -> &BTreeSet<GroundAtom> {
        &self.preconditions
    }

    #[must_use]
    pub fn add_effects(&self) -> &BTreeSet<GroundAtom> {
        &self.add_effects
    }

    #[must_use]
    pub fn delete_effects(&self) -> &BTreeSet<GroundAtom> {
        &self.delete_effects
    }

    /// Whether applying this operator can change a symbolic state at all.
    #[must_use]
    pub fn has_effects(&self) -> bool {
        !self.add_effects.is_empty() || !self.delete_effects.is_empty()
    }

    /// A copy with a replaced precondition set.
    #[must_use]
    pub fn with_preconditions(&self, preconditions: BTreeSet<GroundAtom>) -> Self {
        Self {
            preconditions,
            ..self.clone()
        }
    }

    /// A copy with a replaced add-effect set.
    #[must_use]
    pub fn with_add_effects(&self, add_effects: BTreeSet<GroundAtom>) -> Self {
        Self {
            add_effects,
            ..self.clone()
        }
    }

    /// Invoke the sampler and bind the resulting parameters into an option.
    #[must_use]
    pub fn sample_option(
        &self,
        state: &State,
        goal: &BTreeSet<GroundAtom>,
        rng: &mut StdRng,
    ) -> OptionValue {
        let params = (self.sampler)(state, goal, rng, &self.objects);
        OptionValue::new(self.option.clone(), self.option_objects.clone(), params)
    }
}

impl PartialEq for GroundOperator {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.objects == other.objects
    }
}

impl Eq for GroundOperator {}

impl PartialOrd for GroundOperator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroundOperator {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.objects.cmp(&other.objects))
    }
}

impl Hash for GroundOperator {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.name.hash(hasher);
        self.objects.hash(hasher);
    }
}

impl fmt::Debug for GroundOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.objects.iter().map(Object::name).collect();
        write!(f, "{}({})", self.name, names.join(", "))
    }
}

/// Every grounding of `operator` over `objects`, in deterministic order.
/// The same object may appear in several parameter slots.
#[must_use]
pub fn all_ground_operators(operator: &Operator, objects: &[Object]) -> Vec<GroundOperator> {
    let types: Vec<Arc<Type>> = operator
        .parameters()
        .iter()
        .map(|param| param.ty().clone())
        .collect();
    get_object_combinations(objects, &types, true)
        .into_iter()
        .map(|choice| operator.ground(choice))
        .collect()
}

/// The predicates and types mentioned anywhere in the given operators'
/// atom sets, keyed by name.
#[must_use]
pub fn extract_preds_and_types(
    operators: &[Arc<Operator>],
) -> (BTreeMap<String, Predicate>, BTreeMap<String, Arc<Type>>) {
    let mut preds = BTreeMap::new();
    let mut types = BTreeMap::new();
    for op in operators {
        let atoms = op
            .preconditions()
            .iter()
            .chain(op.add_effects())
            .chain(op.delete_effects());
        for atom in atoms {
            for ty in atom.predicate().types() {
                types.insert(ty.name().to_string(), ty.clone());
            }
            preds.insert(
                atom.predicate().name().to_string(),
                atom.predicate().clone(),
            );
        }
    }
    (preds, types)
}

/// Successor symbolic state: `(atoms \ delete-effects) ∪ add-effects`.
#[must_use]
pub fn apply_operator(
    operator: &GroundOperator,
    atoms: &BTreeSet<GroundAtom>,
) -> BTreeSet<GroundAtom> {
    let mut next = atoms.clone();
    for atom in operator.delete_effects() {
        next.remove(atom);
    }
    for atom in operator.add_effects() {
        next.insert(atom.clone());
    }
    next
}

/// The operators whose preconditions are satisfied by `atoms`.
pub fn get_applicable_operators<'a>(
    ground_operators: &'a [Arc<GroundOperator>],
    atoms: &'a BTreeSet<GroundAtom>,
) -> impl Iterator<Item = &'a Arc<GroundOperator>> {
    ground_operators
        .iter()
        .filter(|op| op.preconditions().is_subset(atoms))
}
