//! Core state machine types.
//!
//! This module contains the building blocks the machine is made of:
//! - State identity via the `StateId` trait and behavior via `State`
//! - Guard predicates for transition control
//! - History strategies for "back" navigation

mod guard;
mod history;
mod state;

pub use guard::{Guard, Predicate};
pub use history::{HistoryEntry, HistoryStrategy, NoHistory, StackHistory};
pub use state::{EmptyState, State, StateId};
