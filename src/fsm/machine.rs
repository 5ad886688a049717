//! Tick-driven state machine.

use super::node::{ActiveNode, Slot, StateNode};
use super::transition::{Transition, TransitionData, TransitionSet, Trigger};
use crate::core::{EmptyState, Guard, HistoryEntry, HistoryStrategy, State, StateId};
use std::collections::HashMap;
use std::fmt;

/// Result of a switch request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwitchOutcome<K: StateId> {
    /// The machine left `from` and entered `to`
    Switched { from: K, to: K },

    /// Nothing to do: the target is already current, or there was no
    /// history entry to go back to
    Unchanged,

    /// No state is registered under the target; the machine stayed put
    NotFound(K),
}

impl<K: StateId> SwitchOutcome<K> {
    pub fn is_switched(&self) -> bool {
        matches!(self, Self::Switched { .. })
    }
}

/// State machine keyed by state identifier.
///
/// The machine owns one node per identifier, a set of wildcard
/// ("any state") transitions and an optional history strategy. It does no
/// work on its own: every call to [`update`](Self::update) evaluates
/// wildcard edges first, then the current node's edges, and either switches
/// or ticks the current state.
///
/// A fresh machine sits on the built-in empty state, so there is always a
/// current state.
///
/// # Example
///
/// ```rust
/// use statehop::core::{Guard, State};
/// use statehop::fsm::StateMachine;
/// use statehop::state_enum;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// state_enum! {
///     enum Screen {
///         Menu,
///         Playing,
///     }
/// }
///
/// struct Menu;
/// impl State<Screen> for Menu {
///     fn id(&self) -> Screen { Screen::Menu }
/// }
///
/// struct Playing;
/// impl State<Screen> for Playing {
///     fn id(&self) -> Screen { Screen::Playing }
/// }
///
/// let start_pressed = Rc::new(Cell::new(false));
/// let pressed = Rc::clone(&start_pressed);
///
/// let mut machine: StateMachine<Screen> = StateMachine::new();
/// machine.set_initial_state(Menu, true, None);
/// machine.add_state(Playing);
/// machine.add_transition(Screen::Menu, Screen::Playing, Guard::new(move || pressed.get()));
///
/// machine.update(0.016);
/// assert_eq!(machine.current_state_type(), &Screen::Menu);
///
/// start_pressed.set(true);
/// machine.update(0.016);
/// assert_eq!(machine.current_state_type(), &Screen::Playing);
/// ```
pub struct StateMachine<K: StateId, D: Clone + 'static = ()> {
    nodes: HashMap<K, Slot<K, D>>,
    any_transitions: TransitionSet<K>,
    current: ActiveNode<K, D>,
    history: Option<Box<dyn HistoryStrategy<K, D>>>,
}

impl<K: StateId, D: Clone + 'static> StateMachine<K, D> {
    /// Create a machine without history, current on the empty state.
    pub fn new() -> Self {
        let empty: Box<dyn State<K, D>> = Box::new(EmptyState::new());
        Self {
            nodes: HashMap::new(),
            any_transitions: TransitionSet::new(),
            current: ActiveNode::new(K::empty(), StateNode::new(empty)),
            history: None,
        }
    }

    /// Create a machine that records activations in `history`.
    pub fn with_history<H>(history: H) -> Self
    where
        H: HistoryStrategy<K, D> + 'static,
    {
        let mut machine = Self::new();
        machine.history = Some(Box::new(history));
        machine
    }

    pub(crate) fn set_history_strategy(&mut self, history: Box<dyn HistoryStrategy<K, D>>) {
        self.history = Some(history);
    }

    /// Make `state` current without running any exit hook.
    ///
    /// If a node for the state's identifier is already registered, that
    /// node (and its instance) is used and `state` is dropped. The
    /// activation is saved to history when a strategy is configured, and
    /// `enter_state` runs only when `on_enter_call` is set.
    pub fn set_initial_state<S>(&mut self, state: S, on_enter_call: bool, data: Option<D>)
    where
        S: State<K, D> + 'static,
    {
        self.install_initial(Box::new(state), on_enter_call, data);
    }

    pub(crate) fn install_initial(
        &mut self,
        state: Box<dyn State<K, D>>,
        on_enter_call: bool,
        data: Option<D>,
    ) {
        let id = state.id();
        let reinstalled = self.current.holds(&id);

        if !reinstalled {
            let node = match self.nodes.remove(&id) {
                Some(Slot::Bound(node)) => node,
                Some(Slot::Declared(transitions)) => {
                    StateNode::with_transitions(state, transitions)
                }
                None => StateNode::new(state),
            };
            let previous = std::mem::replace(&mut self.current, ActiveNode::new(id.clone(), node));
            self.park(previous);
        }

        // The current entry already records this state.
        if !reinstalled {
            if let Some(history) = self.history.as_mut() {
                history.save(id.clone(), data.clone());
            }
        }

        tracing::debug!(state = id.name(), on_enter_call, "initial state set");

        if on_enter_call {
            let record = TransitionData::new(None, id, Trigger::Initial, data);
            self.current.node.state.enter_state(&record);
        }
    }

    /// Register `state` unless a state is already registered under its
    /// identifier. Edges declared for the identifier are kept.
    ///
    /// Returns whether `state` was registered.
    pub fn add_state<S>(&mut self, state: S) -> bool
    where
        S: State<K, D> + 'static,
    {
        self.bind(Box::new(state))
    }

    pub(crate) fn bind(&mut self, state: Box<dyn State<K, D>>) -> bool {
        let id = state.id();
        if self.current.holds(&id) {
            return false;
        }

        match self.nodes.remove(&id) {
            Some(Slot::Bound(node)) => {
                self.nodes.insert(id, Slot::Bound(node));
                false
            }
            Some(Slot::Declared(transitions)) => {
                let node = StateNode::with_transitions(state, transitions);
                self.nodes.insert(id, Slot::Bound(node));
                true
            }
            None => {
                self.nodes.insert(id, Slot::Bound(StateNode::new(state)));
                true
            }
        }
    }

    /// Register `state` with exactly `transitions` as its edges, replacing
    /// whatever was registered under its identifier.
    ///
    /// If the replaced node is current, it keeps running until the next
    /// switch but can no longer be reached by transitions.
    pub fn add_or_overwrite_state<S, I>(&mut self, state: S, transitions: I)
    where
        S: State<K, D> + 'static,
        I: IntoIterator<Item = Transition<K>>,
    {
        let id = state.id();
        let node = StateNode::with_transitions(Box::new(state), transitions.into_iter().collect());

        if self.current.holds(&id) {
            tracing::debug!(state = id.name(), "current state overwritten, detaching it");
            self.current.registered = false;
        }
        self.nodes.insert(id, Slot::Bound(node));
    }

    /// Drop the node registered under `id`. Returns whether one existed.
    ///
    /// Removing the current state detaches it: it keeps running until the
    /// next switch.
    pub fn remove_state(&mut self, id: &K) -> bool {
        if self.current.holds(id) {
            self.current.registered = false;
            return true;
        }
        self.nodes.remove(id).is_some()
    }

    /// Check if a state is registered under `id`.
    pub fn contains_state(&self, id: &K) -> bool {
        self.current.holds(id) || self.nodes.get(id).is_some_and(Slot::is_bound)
    }

    /// Add the edge `from -> to` guarded by `guard`.
    ///
    /// Identifiers without a registered state get a declared node, so edges
    /// can be wired before states are registered.
    pub fn add_transition(&mut self, from: K, to: K, guard: Guard) {
        if !self.current.holds(&to) {
            self.nodes
                .entry(to.clone())
                .or_insert_with(|| Slot::Declared(TransitionSet::new()));
        }
        self.transitions_mut(from).insert(Transition::new(to, guard));
    }

    /// Remove the edge `from -> to` with this exact guard. Unknown edges
    /// are ignored. Returns whether an edge was removed.
    pub fn remove_transition(&mut self, from: &K, to: &K, guard: &Guard) -> bool {
        if self.current.holds(from) {
            return self.current.node.transitions.remove(to, guard);
        }
        self.nodes
            .get_mut(from)
            .is_some_and(|slot| slot.transitions_mut().remove(to, guard))
    }

    /// Add a wildcard edge evaluated for every current state, before the
    /// current state's own edges.
    pub fn add_any_transition(&mut self, to: K, guard: Guard) {
        self.any_transitions.insert(Transition::new(to, guard));
    }

    pub fn remove_any_transition(&mut self, to: &K, guard: &Guard) -> bool {
        self.any_transitions.remove(to, guard)
    }

    /// Edges registered for `from`, in evaluation order.
    pub fn transitions_from(&self, from: &K) -> Option<&[Transition<K>]> {
        if self.current.holds(from) {
            return Some(self.current.node.transitions.as_slice());
        }
        self.nodes.get(from).map(|slot| slot.transitions().as_slice())
    }

    pub fn any_transitions(&self) -> &[Transition<K>] {
        self.any_transitions.as_slice()
    }

    /// Advance the machine by one tick.
    ///
    /// The first ready wildcard edge wins; otherwise the first ready edge of
    /// the current node. When an edge is selected the machine switches
    /// instead of ticking, even if the switch fails. Otherwise the current
    /// state's `update` runs.
    pub fn update(&mut self, delta_time: f32) {
        let selected = self
            .any_transitions
            .first_ready()
            .map(|t| (t.to.clone(), Trigger::AnyTransition))
            .or_else(|| {
                self.current
                    .node
                    .transitions
                    .first_ready()
                    .map(|t| (t.to.clone(), Trigger::Transition))
            });

        match selected {
            Some((to, trigger)) => {
                self.switch_to(to, None, trigger);
            }
            None => self.current.node.state.update(delta_time),
        }
    }

    /// Switch to the state registered under `to`, handing `data` to both
    /// the exit and enter hooks.
    ///
    /// Requesting the current state does nothing. An unknown target is
    /// logged and leaves the machine where it is.
    pub fn set_to_state(&mut self, to: K, data: Option<D>) -> SwitchOutcome<K> {
        self.switch_to(to, data, Trigger::Explicit)
    }

    pub fn set_to_empty_state(&mut self) -> SwitchOutcome<K> {
        self.set_to_state(K::empty(), None)
    }

    fn switch_to(&mut self, to: K, data: Option<D>, trigger: Trigger) -> SwitchOutcome<K> {
        if self.current.holds(&to) {
            return SwitchOutcome::Unchanged;
        }

        let node = match self.nodes.remove(&to) {
            Some(Slot::Bound(node)) => node,
            Some(declared) => {
                self.nodes.insert(to.clone(), declared);
                tracing::warn!(state = to.name(), "state has no registered instance");
                return SwitchOutcome::NotFound(to);
            }
            None => {
                tracing::warn!(state = to.name(), "state not found in state machine");
                return SwitchOutcome::NotFound(to);
            }
        };

        let from = self.current.id.clone();
        let record = TransitionData::new(Some(from.clone()), to.clone(), trigger, data);

        self.current.node.state.exit_state(&record);
        // A detached state entering its replacement keeps the same entry.
        if from != to {
            if let Some(history) = self.history.as_mut() {
                history.save(to.clone(), record.payload.clone());
            }
        }
        let previous = std::mem::replace(&mut self.current, ActiveNode::new(to.clone(), node));
        self.park(previous);
        self.current.node.state.enter_state(&record);

        tracing::debug!(from = from.name(), to = to.name(), ?trigger, "switched state");
        SwitchOutcome::Switched { from, to }
    }

    /// Put a node that stopped being current back into the registry, or
    /// drop it if it was detached.
    fn park(&mut self, previous: ActiveNode<K, D>) {
        if previous.registered {
            self.nodes.insert(previous.id, Slot::Bound(previous.node));
        }
    }

    fn transitions_mut(&mut self, from: K) -> &mut TransitionSet<K> {
        if self.current.holds(&from) {
            return &mut self.current.node.transitions;
        }
        self.nodes
            .entry(from)
            .or_insert_with(|| Slot::Declared(TransitionSet::new()))
            .transitions_mut()
    }

    pub fn current_state(&self) -> &dyn State<K, D> {
        &*self.current.node.state
    }

    pub fn current_state_mut(&mut self) -> &mut dyn State<K, D> {
        &mut *self.current.node.state
    }

    pub fn current_state_type(&self) -> &K {
        &self.current.id
    }

    /// Whether the current state was overwritten or removed and will be
    /// dropped on the next switch.
    pub fn is_current_detached(&self) -> bool {
        !self.current.registered
    }

    pub fn has_history(&self) -> bool {
        self.history.is_some()
    }

    /// Go back to the state recorded before the current one.
    ///
    /// Without a history strategy, or with nothing to go back to, this logs
    /// and leaves the machine unchanged. The history is only consumed once
    /// the recorded state is known to be registered; an unregistered target
    /// yields `NotFound` and leaves the history as it was. Entries that
    /// repeat the current state are collapsed and skipped.
    pub fn restore_state(&mut self) -> SwitchOutcome<K> {
        let Some(history) = self.history.as_mut() else {
            tracing::warn!("no history strategy configured, cannot restore");
            return SwitchOutcome::Unchanged;
        };

        let target = loop {
            let Some(peeked) = history.restore(false) else {
                tracing::warn!("no state to restore");
                return SwitchOutcome::Unchanged;
            };
            if !self.current.holds(&peeked.state) {
                break peeked.state;
            }

            // Drop the repeated entry and record the current state again.
            let Some(repeated) = history.restore(true) else {
                return SwitchOutcome::Unchanged;
            };
            history.save(repeated.state, repeated.data);
        };

        if !self.nodes.get(&target).is_some_and(Slot::is_bound) {
            tracing::warn!(state = target.name(), "state to restore is no longer registered");
            return SwitchOutcome::NotFound(target);
        }

        match history.restore(true) {
            Some(entry) => self.switch_to(entry.state, entry.data, Trigger::Restore),
            None => SwitchOutcome::Unchanged,
        }
    }

    /// Look at the entry `restore_state` would go back to, without
    /// consuming it.
    pub fn peek_history(&mut self) -> Option<HistoryEntry<K, D>> {
        let Some(history) = self.history.as_mut() else {
            tracing::warn!("no history strategy configured, nothing to peek");
            return None;
        };
        history.restore(false)
    }

    /// Entries held by the history strategy, oldest first.
    pub fn history_snapshot(&self) -> Vec<HistoryEntry<K, D>> {
        self.history
            .as_ref()
            .map(|history| history.snapshot())
            .unwrap_or_default()
    }
}

impl<K: StateId, D: Clone + 'static> Default for StateMachine<K, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateId, D: Clone + 'static> fmt::Debug for StateMachine<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current.id)
            .field("detached", &!self.current.registered)
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("any_transitions", &self.any_transitions.len())
            .field("history", &self.history.is_some())
            .finish()
    }
}
