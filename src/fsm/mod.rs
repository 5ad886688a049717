//! The state machine runtime.
//!
//! # Key Concepts
//!
//! - **Transitions**: guarded edges, per state or from any state
//! - **State Machine**: resolves edges every tick and switches states
//! - **Transition data**: the record each switch hands to exit/enter hooks

mod machine;
mod node;
mod transition;

pub use machine::{StateMachine, SwitchOutcome};
pub use transition::{Transition, TransitionData, TransitionSet, Trigger};
