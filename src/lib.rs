//! Statehop: a tick-driven state machine with history
//!
//! Statehop drives the flow of an interactive application (menus, play,
//! pause, restart) from a host update loop. The machine does no work on its
//! own; every call to `update` checks guarded transitions and either
//! switches states or ticks the current one.
//!
//! # Core Concepts
//!
//! - **State**: behavior behind the `State` trait, keyed by a `StateId`
//! - **Guards**: predicates re-evaluated every tick
//! - **Any-state transitions**: edges that pre-empt every state's own edges
//! - **History**: pluggable save/restore for "back" navigation
//!
//! # Example
//!
//! ```rust
//! use statehop::builder::StateMachineBuilder;
//! use statehop::core::{Guard, StackHistory, State};
//! use statehop::state_enum;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! state_enum! {
//!     enum Flow {
//!         Menu,
//!         Playing,
//!         Paused,
//!     }
//! }
//!
//! struct Screen(Flow);
//!
//! impl State<Flow> for Screen {
//!     fn id(&self) -> Flow {
//!         self.0
//!     }
//! }
//!
//! let pause = Rc::new(Cell::new(false));
//! let pause_pressed = Rc::clone(&pause);
//!
//! let mut machine = StateMachineBuilder::<Flow>::new()
//!     .with_initial_state(Screen(Flow::Menu), true, None)
//!     .with_state(Screen(Flow::Playing))
//!     .with_state(Screen(Flow::Paused))
//!     .with_transition(Flow::Menu, Flow::Playing, Guard::always())
//!     .with_any_transition(Flow::Paused, Guard::new(move || pause_pressed.get()))
//!     .with_history_strategy(StackHistory::new())
//!     .build();
//!
//! machine.update(0.016);
//! assert_eq!(machine.current_state_type(), &Flow::Playing);
//!
//! pause.set(true);
//! machine.update(0.016);
//! assert_eq!(machine.current_state_type(), &Flow::Paused);
//!
//! pause.set(false);
//! machine.restore_state();
//! assert_eq!(machine.current_state_type(), &Flow::Playing);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod fsm;

// Re-export commonly used types
pub use builder::StateMachineBuilder;
pub use core::{Guard, HistoryStrategy, StackHistory, State, StateId};
pub use fsm::{StateMachine, SwitchOutcome, TransitionData, Trigger};
