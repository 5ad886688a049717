//! State history for "back" navigation.
//!
//! The machine only depends on the two-operation `HistoryStrategy`
//! contract. `StackHistory` is the stack-shaped implementation most hosts
//! want, `NoHistory` records nothing.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One recorded activation: `state` became current with payload `data`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "D: Serialize", deserialize = "D: DeserializeOwned"))]
pub struct HistoryEntry<K: StateId, D> {
    /// The state that became current
    pub state: K,
    /// Payload the state was entered with
    pub data: Option<D>,
    /// When the activation was recorded
    pub recorded_at: DateTime<Utc>,
}

impl<K: StateId, D> HistoryEntry<K, D> {
    pub fn new(state: K, data: Option<D>) -> Self {
        Self {
            state,
            data,
            recorded_at: Utc::now(),
        }
    }
}

/// Pluggable save/restore of machine activations.
///
/// `save` is called by the machine for the initial state and for every
/// committed switch. `restore` returns the entry recorded before the current
/// one, consuming it when `remove` is true and peeking otherwise. `None`
/// means there is nothing to go back to.
pub trait HistoryStrategy<K: StateId, D: Clone> {
    fn save(&mut self, state: K, data: Option<D>);

    fn restore(&mut self, remove: bool) -> Option<HistoryEntry<K, D>>;

    /// Recorded entries, oldest first. Strategies that keep nothing
    /// return an empty list.
    fn snapshot(&self) -> Vec<HistoryEntry<K, D>> {
        Vec::new()
    }
}

/// Stack of activations, optionally bounded.
///
/// The top of the stack is the current state. Restoring with removal pops
/// the current entry and the one below it and returns the latter; the
/// machine saves it again when it switches back, so the next peek yields
/// the entry before it.
///
/// A bounded stack evicts its oldest entry once `capacity` is exceeded.
///
/// # Example
///
/// ```rust
/// use statehop::core::{HistoryStrategy, StackHistory};
/// use statehop::state_enum;
///
/// state_enum! {
///     enum Screen {
///         Menu,
///         Playing,
///         Paused,
///     }
/// }
///
/// let mut history: StackHistory<Screen> = StackHistory::new();
/// history.save(Screen::Menu, None);
/// history.save(Screen::Playing, None);
/// history.save(Screen::Paused, None);
///
/// let peeked = history.restore(false).unwrap();
/// assert_eq!(peeked.state, Screen::Playing);
/// assert_eq!(history.len(), 3);
///
/// let restored = history.restore(true).unwrap();
/// assert_eq!(restored.state, Screen::Playing);
/// assert_eq!(history.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct StackHistory<K: StateId, D = ()> {
    entries: VecDeque<HistoryEntry<K, D>>,
    capacity: Option<usize>,
}

impl<K: StateId, D> Default for StackHistory<K, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateId, D> StackHistory<K, D> {
    /// Create an unbounded history.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: None,
        }
    }

    /// Create a history that keeps at most `capacity` entries.
    ///
    /// A capacity below 2 can never restore, since restoring needs the
    /// current entry and one before it.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: Some(capacity),
        }
    }

    /// Rebuild a history from previously recorded entries, oldest first.
    pub fn from_entries<I>(entries: I, capacity: Option<usize>) -> Self
    where
        I: IntoIterator<Item = HistoryEntry<K, D>>,
    {
        let mut history = Self {
            entries: entries.into_iter().collect(),
            capacity,
        };
        history.evict_overflow();
        history
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry<K, D>> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn evict_overflow(&mut self) {
        if let Some(capacity) = self.capacity {
            while self.entries.len() > capacity {
                self.entries.pop_front();
            }
        }
    }
}

impl<K: StateId, D: Clone> HistoryStrategy<K, D> for StackHistory<K, D> {
    fn save(&mut self, state: K, data: Option<D>) {
        self.entries.push_back(HistoryEntry::new(state, data));
        self.evict_overflow();
    }

    fn restore(&mut self, remove: bool) -> Option<HistoryEntry<K, D>> {
        if self.entries.len() < 2 {
            return None;
        }

        if !remove {
            return self.entries.get(self.entries.len() - 2).cloned();
        }

        self.entries.pop_back();
        self.entries.pop_back()
    }

    fn snapshot(&self) -> Vec<HistoryEntry<K, D>> {
        self.entries.iter().cloned().collect()
    }
}

/// Strategy that records nothing. Restoring always yields `None`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHistory;

impl<K: StateId, D: Clone> HistoryStrategy<K, D> for NoHistory {
    fn save(&mut self, _state: K, _data: Option<D>) {}

    fn restore(&mut self, _remove: bool) -> Option<HistoryEntry<K, D>> {
        None
    }
}
