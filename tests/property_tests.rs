//! Property-based tests for the state machine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use statehop::core::{Guard, HistoryStrategy, StackHistory, State, StateId};
use statehop::fsm::{StateMachine, SwitchOutcome};
use statehop::state_enum;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

state_enum! {
    enum Flow {
        Menu,
        Playing,
        Paused,
        Restart,
    }
}

const REGISTERED: [Flow; 4] = [Flow::Menu, Flow::Playing, Flow::Paused, Flow::Restart];

struct Counting {
    id: Flow,
    calls: Rc<RefCell<Vec<(Flow, &'static str)>>>,
}

impl State<Flow, u8> for Counting {
    fn id(&self) -> Flow {
        self.id
    }

    fn enter_state(&mut self, _data: &statehop::TransitionData<Flow, u8>) {
        self.calls.borrow_mut().push((self.id, "enter"));
    }

    fn exit_state(&mut self, _data: &statehop::TransitionData<Flow, u8>) {
        self.calls.borrow_mut().push((self.id, "exit"));
    }

    fn update(&mut self, _delta_time: f32) {
        self.calls.borrow_mut().push((self.id, "update"));
    }
}

type Calls = Rc<RefCell<Vec<(Flow, &'static str)>>>;

fn machine_with_history() -> (StateMachine<Flow, u8>, Calls) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut machine = StateMachine::with_history(StackHistory::new());
    for id in REGISTERED {
        machine.add_state(Counting {
            id,
            calls: Rc::clone(&calls),
        });
    }
    machine.set_initial_state(
        Counting {
            id: Flow::Menu,
            calls: Rc::clone(&calls),
        },
        false,
        None,
    );
    (machine, calls)
}

prop_compose! {
    fn arbitrary_flow()(variant in 0..5u8) -> Flow {
        match variant {
            0 => Flow::Menu,
            1 => Flow::Playing,
            2 => Flow::Paused,
            3 => Flow::Restart,
            _ => Flow::Empty,
        }
    }
}

proptest! {
    #[test]
    fn state_name_is_stable(flow in arbitrary_flow()) {
        prop_assert_eq!(flow.name(), flow.name());
    }

    #[test]
    fn update_switches_iff_an_edge_is_ready(
        ready in prop::collection::vec(any::<bool>(), 0..6),
        targets in prop::collection::vec(arbitrary_flow(), 6),
    ) {
        let (mut machine, calls) = machine_with_history();
        for (is_ready, to) in ready.iter().zip(targets.iter()) {
            let value = *is_ready;
            machine.add_transition(Flow::Menu, *to, Guard::new(move || value));
        }
        calls.borrow_mut().clear();

        machine.update(0.016);

        let expected = ready
            .iter()
            .zip(targets.iter())
            .find(|(is_ready, _)| **is_ready)
            .map(|(_, to)| *to);

        match expected {
            Some(to) => {
                // Every target is registered, so the first ready edge wins.
                prop_assert_eq!(machine.current_state_type(), &to);
                prop_assert!(!calls.borrow().contains(&(Flow::Menu, "update")));
            }
            None => {
                prop_assert_eq!(machine.current_state_type(), &Flow::Menu);
                prop_assert_eq!(calls.borrow().clone(), vec![(Flow::Menu, "update")]);
            }
        }
    }

    #[test]
    fn any_transition_always_preempts(
        state_target in arbitrary_flow(),
        any_target in arbitrary_flow(),
    ) {
        let (mut machine, _) = machine_with_history();
        machine.add_transition(Flow::Menu, state_target, Guard::always());
        machine.add_any_transition(any_target, Guard::always());

        machine.update(0.016);

        prop_assert_eq!(machine.current_state_type(), &any_target);
    }

    #[test]
    fn switching_to_current_state_never_calls_hooks(flow in arbitrary_flow()) {
        let (mut machine, calls) = machine_with_history();
        machine.set_to_state(flow, None);
        calls.borrow_mut().clear();
        let history_len = machine.history_snapshot().len();

        let outcome = machine.set_to_state(flow, Some(1));

        prop_assert_eq!(outcome, SwitchOutcome::Unchanged);
        prop_assert!(calls.borrow().is_empty());
        prop_assert_eq!(machine.history_snapshot().len(), history_len);
    }

    #[test]
    fn peek_is_stable_and_restore_steps_back(
        path in prop::collection::vec(arbitrary_flow(), 1..12)
    ) {
        let (mut machine, _) = machine_with_history();
        let mut visited = vec![Flow::Menu];
        for (step, flow) in path.iter().enumerate() {
            if machine.set_to_state(*flow, Some(step as u8)).is_switched() {
                visited.push(*flow);
            }
        }

        if visited.len() < 2 {
            prop_assert!(machine.peek_history().is_none());
            return Ok(());
        }

        let expected = visited[visited.len() - 2];
        for _ in 0..visited.len() {
            prop_assert_eq!(machine.peek_history().map(|e| e.state), Some(expected));
        }

        machine.restore_state();
        prop_assert_eq!(machine.current_state_type(), &expected);

        let before = if visited.len() >= 3 {
            Some(visited[visited.len() - 3])
        } else {
            None
        };
        prop_assert_eq!(machine.peek_history().map(|e| e.state), before);
    }

    #[test]
    fn exit_always_precedes_enter(
        path in prop::collection::vec(arbitrary_flow(), 1..12)
    ) {
        let (mut machine, calls) = machine_with_history();
        for flow in &path {
            let from = *machine.current_state_type();
            calls.borrow_mut().clear();
            if machine.set_to_state(*flow, None).is_switched() {
                prop_assert_eq!(
                    calls.borrow().clone(),
                    vec![(from, "exit"), (*flow, "enter")]
                );
            } else {
                prop_assert!(calls.borrow().is_empty());
            }
        }
    }

    #[test]
    fn bounded_history_never_exceeds_capacity(
        capacity in 1..6usize,
        path in prop::collection::vec(arbitrary_flow(), 0..20),
    ) {
        let mut history: StackHistory<Flow, u8> = StackHistory::with_capacity(capacity);
        for flow in path {
            history.save(flow, None);
            prop_assert!(history.len() <= capacity);
        }
    }

    #[test]
    fn guard_tracks_its_source(values in prop::collection::vec(any::<bool>(), 1..10)) {
        let cell = Rc::new(Cell::new(false));
        let captured = Rc::clone(&cell);
        let guard = Guard::new(move || captured.get());
        for value in values {
            cell.set(value);
            prop_assert_eq!(guard.evaluate(), value);
        }
    }
}
