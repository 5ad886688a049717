//! Builder for constructing state machines.

use crate::core::{Guard, HistoryStrategy, State, StateId};
use crate::fsm::{StateMachine, Transition};

struct InitialState<K: StateId, D> {
    state: Box<dyn State<K, D>>,
    on_enter_call: bool,
    data: Option<D>,
}

/// Builder for constructing state machines with a fluent API.
///
/// Nothing runs until [`build`](Self::build): states are registered, edges
/// wired, and only then is the initial state installed, so its
/// `enter_state` is the first hook to run.
pub struct StateMachineBuilder<K: StateId, D: Clone + 'static = ()> {
    initial: Option<InitialState<K, D>>,
    history: Option<Box<dyn HistoryStrategy<K, D>>>,
    states: Vec<Box<dyn State<K, D>>>,
    transitions: Vec<(K, Transition<K>)>,
    any_transitions: Vec<Transition<K>>,
}

impl<K: StateId, D: Clone + 'static> StateMachineBuilder<K, D> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            history: None,
            states: Vec::new(),
            transitions: Vec::new(),
            any_transitions: Vec::new(),
        }
    }

    /// Set the initial state. Without one the machine starts on the empty
    /// state.
    pub fn with_initial_state<S>(mut self, state: S, on_enter_call: bool, data: Option<D>) -> Self
    where
        S: State<K, D> + 'static,
    {
        self.initial = Some(InitialState {
            state: Box::new(state),
            on_enter_call,
            data,
        });
        self
    }

    /// Record activations with `history`, enabling `restore_state`.
    pub fn with_history_strategy<H>(mut self, history: H) -> Self
    where
        H: HistoryStrategy<K, D> + 'static,
    {
        self.history = Some(Box::new(history));
        self
    }

    /// Register an additional state. The first registration of an
    /// identifier wins, including over the initial state.
    pub fn with_state<S>(mut self, state: S) -> Self
    where
        S: State<K, D> + 'static,
    {
        self.states.push(Box::new(state));
        self
    }

    /// Add the edge `from -> to` guarded by `guard`.
    pub fn with_transition(mut self, from: K, to: K, guard: Guard) -> Self {
        self.transitions.push((from, Transition::new(to, guard)));
        self
    }

    /// Add a wildcard edge to `to`.
    pub fn with_any_transition(mut self, to: K, guard: Guard) -> Self {
        self.any_transitions.push(Transition::new(to, guard));
        self
    }

    /// Build the state machine.
    pub fn build(self) -> StateMachine<K, D> {
        let mut machine = StateMachine::new();
        if let Some(history) = self.history {
            machine.set_history_strategy(history);
        }

        for state in self.states {
            machine.bind(state);
        }
        for (from, transition) in self.transitions {
            machine.add_transition(from, transition.to, transition.guard);
        }
        for transition in self.any_transitions {
            machine.add_any_transition(transition.to, transition.guard);
        }

        if let Some(initial) = self.initial {
            machine.install_initial(initial.state, initial.on_enter_call, initial.data);
        }

        machine
    }
}

impl<K: StateId, D: Clone + 'static> Default for StateMachineBuilder<K, D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StackHistory;
    use crate::fsm::TransitionData;
    use serde::{Deserialize, Serialize};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Empty,
        Menu,
        Playing,
        Paused,
    }

    impl StateId for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Empty => "Empty",
                Self::Menu => "Menu",
                Self::Playing => "Playing",
                Self::Paused => "Paused",
            }
        }

        fn empty() -> Self {
            Self::Empty
        }
    }

    struct Recorder {
        id: TestState,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl State<TestState, &'static str> for Recorder {
        fn id(&self) -> TestState {
            self.id
        }

        fn enter_state(&mut self, data: &TransitionData<TestState, &'static str>) {
            self.log.borrow_mut().push(format!(
                "enter({}, {})",
                self.id.name(),
                data.payload.unwrap_or("-")
            ));
        }
    }

    fn recorder(id: TestState, log: &Rc<RefCell<Vec<String>>>) -> Recorder {
        Recorder {
            id,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn builder_without_initial_state_sits_on_empty() {
        let machine = StateMachineBuilder::<TestState>::new().build();

        assert_eq!(machine.current_state_type(), &TestState::Empty);
        assert!(machine.contains_state(&TestState::Empty));
        assert!(!machine.has_history());
    }

    #[test]
    fn enter_runs_only_on_build() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let builder = StateMachineBuilder::<TestState, &'static str>::new()
            .with_initial_state(recorder(TestState::Menu, &log), true, Some("boot"));
        assert!(log.borrow().is_empty());

        let machine = builder.build();
        assert_eq!(machine.current_state_type(), &TestState::Menu);
        assert_eq!(*log.borrow(), vec!["enter(Menu, boot)"]);
    }

    #[test]
    fn enter_call_can_be_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let machine = StateMachineBuilder::<TestState, &'static str>::new()
            .with_initial_state(recorder(TestState::Menu, &log), false, None)
            .build();

        assert_eq!(machine.current_state_type(), &TestState::Menu);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn history_strategy_records_initial_state() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let machine = StateMachineBuilder::<TestState, &'static str>::new()
            .with_initial_state(recorder(TestState::Menu, &log), false, Some("boot"))
            .with_history_strategy(StackHistory::new())
            .build();

        let snapshot = machine.history_snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].state, TestState::Menu);
        assert_eq!(snapshot[0].data, Some("boot"));
    }

    #[test]
    fn fluent_api_wires_graph() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut machine = StateMachineBuilder::<TestState, &'static str>::new()
            .with_initial_state(recorder(TestState::Menu, &log), false, None)
            .with_state(recorder(TestState::Playing, &log))
            .with_state(recorder(TestState::Paused, &log))
            .with_transition(TestState::Menu, TestState::Playing, Guard::always())
            .with_any_transition(TestState::Paused, Guard::new(|| false))
            .build();

        assert_eq!(machine.transitions_from(&TestState::Menu).unwrap().len(), 1);
        assert_eq!(machine.any_transitions().len(), 1);

        machine.update(0.016);
        assert_eq!(machine.current_state_type(), &TestState::Playing);
        assert_eq!(*log.borrow(), vec!["enter(Playing, -)"]);
    }

    #[test]
    fn registered_state_wins_over_initial_instance() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let machine = StateMachineBuilder::<TestState, &'static str>::new()
            .with_state(recorder(TestState::Menu, &first))
            .with_initial_state(recorder(TestState::Menu, &second), true, None)
            .build();

        assert_eq!(machine.current_state_type(), &TestState::Menu);
        assert_eq!(first.borrow().len(), 1);
        assert!(second.borrow().is_empty());
    }
}
