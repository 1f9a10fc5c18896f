//! Object-oriented world states.
//!
//! A [`State`] is a collection of named [`ObjectInstance`]s. Each object
//! belongs to a class (e.g. `agent`, `block`) and carries a set of named
//! attribute values. States are values: actions never mutate a state in
//! place, they produce a new one.
//!
//! # Object Matching
//!
//! Two states can describe the same situation while naming their objects
//! differently (`block0` in one state is `b7` in another).
//! [`State::object_matches_to`] establishes a correspondence by pairing
//! objects of the same class with identical attribute values. Matching a
//! state against itself always yields the identity mapping because an
//! object prefers a same-named partner when one is available.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ids::ObjectName;
use crate::value::Value;

/// A single object in a state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectInstance {
    /// The object's name, unique within its state.
    pub name: ObjectName,
    /// The object class this instance belongs to.
    pub class: String,
    /// Attribute values keyed by attribute name.
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
}

impl ObjectInstance {
    /// Create an object with no attribute values.
    pub fn new(name: impl Into<ObjectName>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style attribute assignment.
    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(attribute.into(), value.into());
        self
    }

    /// Set an attribute value, replacing any previous value.
    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(attribute.into(), value.into());
    }

    /// Look up an attribute value.
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.values.get(attribute)
    }

    /// Look up an integer attribute.
    pub fn int(&self, attribute: &str) -> Option<i64> {
        self.get(attribute).and_then(Value::as_int)
    }

    /// Look up a boolean attribute.
    pub fn flag(&self, attribute: &str) -> Option<bool> {
        self.get(attribute).and_then(Value::as_bool)
    }

    /// Look up a text attribute.
    pub fn text(&self, attribute: &str) -> Option<&str> {
        self.get(attribute).and_then(Value::as_text)
    }

    /// Whether two objects are interchangeable: same class, same values.
    /// Names are ignored.
    pub fn value_equivalent(&self, other: &Self) -> bool {
        self.class == other.class && self.values == other.values
    }
}

/// An OO-MDP state: a set of objects keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    /// Objects keyed by their name.
    #[serde(default)]
    pub objects: BTreeMap<ObjectName, ObjectInstance>,
}

impl State {
    /// Create an empty state.
    pub const fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
        }
    }

    /// Builder-style object insertion.
    #[must_use]
    pub fn with_object(mut self, object: ObjectInstance) -> Self {
        self.insert(object);
        self
    }

    /// Insert an object, replacing any object with the same name.
    pub fn insert(&mut self, object: ObjectInstance) {
        self.objects.insert(object.name.clone(), object);
    }

    /// Remove an object by name.
    pub fn remove(&mut self, name: &ObjectName) -> Option<ObjectInstance> {
        self.objects.remove(name)
    }

    /// Look up an object by name.
    pub fn object(&self, name: &ObjectName) -> Option<&ObjectInstance> {
        self.objects.get(name)
    }

    /// Look up an object by name for modification.
    pub fn object_mut(&mut self, name: &ObjectName) -> Option<&mut ObjectInstance> {
        self.objects.get_mut(name)
    }

    /// All objects of the given class, in name order.
    pub fn objects_of_class<'a>(
        &'a self,
        class: &'a str,
    ) -> impl Iterator<Item = &'a ObjectInstance> + 'a {
        self.objects.values().filter(move |o| o.class == class)
    }

    /// The first object of the given class in name order.
    ///
    /// Convenient for domains with a single distinguished object (such
    /// as the agent in a grid world).
    pub fn first_of_class(&self, class: &str) -> Option<&ObjectInstance> {
        self.objects.values().find(|o| o.class == class)
    }

    /// Iterate over all objects in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectInstance> {
        self.objects.values()
    }

    /// Number of objects in the state.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the state contains no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Establish a correspondence between this state's objects and the
    /// objects of `target`.
    ///
    /// Every object in `self` is paired with a distinct object in
    /// `target` of the same class and with identical attribute values.
    /// A same-named partner is preferred, so matching a state with itself
    /// returns the identity mapping.
    ///
    /// Returns `None` when the states hold different numbers of objects or
    /// when some object has no counterpart.
    pub fn object_matches_to(&self, target: &Self) -> Option<BTreeMap<ObjectName, ObjectName>> {
        if self.len() != target.len() {
            return None;
        }

        let mut used: BTreeSet<&ObjectName> = BTreeSet::new();
        let mut matching = BTreeMap::new();

        for source in self.objects.values() {
            let same_named = target
                .objects
                .get(&source.name)
                .filter(|candidate| !used.contains(&candidate.name))
                .filter(|candidate| source.value_equivalent(candidate));

            let partner = same_named.or_else(|| {
                target.objects.values().find(|candidate| {
                    !used.contains(&candidate.name) && source.value_equivalent(candidate)
                })
            })?;

            used.insert(&partner.name);
            matching.insert(source.name.clone(), partner.name.clone());
        }

        Some(matching)
    }

    /// Whether two states describe the same situation up to object naming.
    pub fn is_isomorphic_to(&self, other: &Self) -> bool {
        self.object_matches_to(other).is_some()
    }
}

impl FromIterator<ObjectInstance> for State {
    fn from_iter<I: IntoIterator<Item = ObjectInstance>>(iter: I) -> Self {
        let mut state = Self::new();
        for object in iter {
            state.insert(object);
        }
        state
    }
}
