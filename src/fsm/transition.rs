//! Transition edges and the record handed to lifecycle hooks.

use crate::core::{Guard, StateId};
use serde::{Deserialize, Serialize};

/// Directed, guarded edge to `to`.
///
/// Two transitions are equal when they target the same state through the
/// same guard (see [`Guard::same_as`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition<K: StateId> {
    pub to: K,
    pub guard: Guard,
}

impl<K: StateId> Transition<K> {
    pub fn new(to: K, guard: Guard) -> Self {
        Self { to, guard }
    }

    /// Evaluate the guard.
    pub fn is_ready(&self) -> bool {
        self.guard.evaluate()
    }

    fn matches(&self, to: &K, guard: &Guard) -> bool {
        self.to == *to && self.guard.same_as(guard)
    }
}

/// Insertion-ordered set of transitions.
///
/// Adding an edge that is already present is a no-op. The first ready edge
/// in insertion order wins.
#[derive(Clone, Debug)]
pub struct TransitionSet<K: StateId> {
    transitions: Vec<Transition<K>>,
}

impl<K: StateId> Default for TransitionSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateId> TransitionSet<K> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Add an edge, returning `false` if it was already present.
    pub fn insert(&mut self, transition: Transition<K>) -> bool {
        if self.transitions.contains(&transition) {
            return false;
        }
        self.transitions.push(transition);
        true
    }

    /// Remove the edge matching `(to, guard)`, returning whether one was found.
    pub fn remove(&mut self, to: &K, guard: &Guard) -> bool {
        let before = self.transitions.len();
        self.transitions.retain(|t| !t.matches(to, guard));
        self.transitions.len() != before
    }

    /// First edge whose guard currently holds.
    pub fn first_ready(&self) -> Option<&Transition<K>> {
        self.transitions.iter().find(|t| t.is_ready())
    }

    pub fn as_slice(&self) -> &[Transition<K>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

impl<K: StateId> FromIterator<Transition<K>> for TransitionSet<K> {
    fn from_iter<I: IntoIterator<Item = Transition<K>>>(iter: I) -> Self {
        let mut set = Self::new();
        for transition in iter {
            set.insert(transition);
        }
        set
    }
}

/// What caused a switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// The state was installed as the machine's initial state
    Initial,
    /// An edge of the current state fired
    Transition,
    /// A wildcard edge fired
    AnyTransition,
    /// The host called `set_to_state`
    Explicit,
    /// The host went back through the history strategy
    Restore,
}

/// Record passed to `exit_state` and `enter_state` for one switch.
///
/// Both hooks of a switch receive the same record. Predicate-triggered
/// switches carry no payload; explicit and restored switches carry the
/// payload they were requested with.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionData<K: StateId, D = ()> {
    /// Outgoing state, `None` for the initial activation
    pub from: Option<K>,
    /// Incoming state
    pub to: K,
    pub trigger: Trigger,
    pub payload: Option<D>,
}

impl<K: StateId, D> TransitionData<K, D> {
    pub fn new(from: Option<K>, to: K, trigger: Trigger, payload: Option<D>) -> Self {
        Self {
            from,
            to,
            trigger,
            payload,
        }
    }
}
