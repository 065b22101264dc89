//! Typed objects: the object universe a task is grounded over.
//!
//! Types carry an optional parent for simple single-inheritance typing.
//! The hierarchy exists only for substitution filtering — an object may be
//! bound to a parameter whose type is any ancestor of the object's type.

use std::fmt;
use std::sync::Arc;

use itertools::Itertools;

/// A named object type with an optional parent type.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Type {
    name: String,
    parent: Option<Arc<Type>>,
}

impl Type {
    /// Create a root type (no parent).
    #[must_use]
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            parent: None,
        })
    }

    /// Create a subtype of `parent`.
    #[must_use]
    pub fn with_parent(name: &str, parent: &Arc<Type>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            parent: Some(parent.clone()),
        })
    }

    /// The type's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `self` is `other` or a descendant of it.
    #[must_use]
    pub fn is_subtype_of(&self, other: &Type) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty == other {
                return true;
            }
            current = ty.parent.as_deref();
        }
        false
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An opaque identifier with a type.
///
/// Ordering is by (name, type name) so that every iteration over object
/// collections is deterministic.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Object {
    name: String,
    ty: Arc<Type>,
}

impl Object {
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

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty.name)
    }
}

/// All substitutions of `objects` against a typed parameter list, in
/// deterministic (sorted-object, positional-product) order.
///
/// An object is eligible for a slot if its type is the slot type or a
/// descendant of it. With `allow_duplicates`, the same object may fill
/// several slots — ground operators permit this; abstraction does not.
///
/// A nullary parameter list has exactly one substitution: the empty one.
#[must_use]
pub fn get_object_combinations(
    objects: &[Object],
    types: &[Arc<Type>],
    allow_duplicates: bool,
) -> Vec<Vec<Object>> {
    if types.is_empty() {
        return vec![Vec::new()];
    }
    let mut sorted: Vec<&Object> = objects.iter().collect();
    sorted.sort();
    let choices: Vec<Vec<&Object>> = types
        .iter()
        .map(|ty| {
            sorted
                .iter()
                .copied()
                .filter(|obj| obj.ty().is_subtype_of(ty))
                .collect()
        })
        .collect();
    choices
        .into_iter()
        .multi_cartesian_product()
        .filter(|combo| allow_duplicates || combo.iter().all_unique())
        .map(|combo| combo.into_iter().cloned().collect())
        .collect()
}
