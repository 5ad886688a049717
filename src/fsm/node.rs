//! Registry nodes.

use super::transition::TransitionSet;
use crate::core::{State, StateId};

/// A registered state together with its outgoing edges.
pub(crate) struct StateNode<K: StateId, D> {
    pub(crate) state: Box<dyn State<K, D>>,
    pub(crate) transitions: TransitionSet<K>,
}

impl<K: StateId, D> StateNode<K, D> {
    pub(crate) fn new(state: Box<dyn State<K, D>>) -> Self {
        Self::with_transitions(state, TransitionSet::new())
    }

    pub(crate) fn with_transitions(
        state: Box<dyn State<K, D>>,
        transitions: TransitionSet<K>,
    ) -> Self {
        Self { state, transitions }
    }
}

/// Registry entry for one identifier.
///
/// `Declared` holds edges for an identifier that was named by a transition
/// before any state was registered under it. Switching to it fails until a
/// state is bound.
pub(crate) enum Slot<K: StateId, D> {
    Bound(StateNode<K, D>),
    Declared(TransitionSet<K>),
}

impl<K: StateId, D> Slot<K, D> {
    pub(crate) fn transitions(&self) -> &TransitionSet<K> {
        match self {
            Slot::Bound(node) => &node.transitions,
            Slot::Declared(transitions) => transitions,
        }
    }

    pub(crate) fn transitions_mut(&mut self) -> &mut TransitionSet<K> {
        match self {
            Slot::Bound(node) => &mut node.transitions,
            Slot::Declared(transitions) => transitions,
        }
    }

    pub(crate) fn is_bound(&self) -> bool {
        matches!(self, Slot::Bound(_))
    }
}

/// The current node, held outside the registry.
///
/// `registered` is false once the node was overwritten or removed while
/// current; it keeps running until the next switch and is then dropped.
pub(crate) struct ActiveNode<K: StateId, D> {
    pub(crate) id: K,
    pub(crate) node: StateNode<K, D>,
    pub(crate) registered: bool,
}

impl<K: StateId, D> ActiveNode<K, D> {
    pub(crate) fn new(id: K, node: StateNode<K, D>) -> Self {
        Self {
            id,
            node,
            registered: true,
        }
    }

    /// Whether this node is the registered node for `id`.
    pub(crate) fn holds(&self, id: &K) -> bool {
        self.registered && self.id == *id
    }
}
