//! State identity and lifecycle traits.
//!
//! A machine keys its registry by a closed set of identifiers (`StateId`),
//! while the behavior attached to each identifier lives behind the `State`
//! trait object.

use crate::fsm::TransitionData;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

/// Identifier of a state within one machine.
///
/// At most one node per identifier is registered at a time. Identifiers are
/// serializable so history entries and checkpoints can be persisted.
///
/// # Required Traits
///
/// - `Clone`: identifiers are copied into edges and history entries
/// - `Eq` + `Hash`: identifiers key the node registry
/// - `Debug`: identifiers appear in diagnostics
/// - `Serialize` + `Deserialize`: identifiers are written into checkpoints
///
/// # Example
///
/// ```rust
/// use statehop::core::StateId;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Screen {
///     Empty,
///     Menu,
///     Playing,
/// }
///
/// impl StateId for Screen {
///     fn name(&self) -> &str {
///         match self {
///             Self::Empty => "Empty",
///             Self::Menu => "Menu",
///             Self::Playing => "Playing",
///         }
///     }
///
///     fn empty() -> Self {
///         Self::Empty
///     }
/// }
///
/// assert!(Screen::Empty.is_empty());
/// assert!(!Screen::Menu.is_empty());
/// ```
pub trait StateId: Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + 'static {
    /// Get the identifier's name for display/logging.
    fn name(&self) -> &str;

    /// Identifier reserved for the built-in empty state.
    fn empty() -> Self;

    /// Check if this identifier names the empty state.
    fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}

/// Behavior of a state, driven by the machine.
///
/// The machine is the only caller of these hooks. `enter_state` runs exactly
/// once when the state becomes current, `exit_state` exactly once right
/// before the next state's `enter_state`, and `update` once per tick in
/// which no transition fired.
///
/// Hooks have no access to the machine. A state that wants to leave exposes
/// a flag that a transition predicate reads on the next tick.
pub trait State<K: StateId, D = ()> {
    /// Identifier under which this state is registered.
    fn id(&self) -> K;

    fn enter_state(&mut self, _data: &TransitionData<K, D>) {}

    fn exit_state(&mut self, _data: &TransitionData<K, D>) {}

    fn update(&mut self, _delta_time: f32) {}
}

/// Built-in no-op state registered under `K::empty()` in every machine.
#[derive(Debug)]
pub struct EmptyState<K> {
    _phantom: PhantomData<K>,
}

impl<K> EmptyState<K> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<K> Default for EmptyState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateId, D> State<K, D> for EmptyState<K> {
    fn id(&self) -> K {
        K::empty()
    }
}
