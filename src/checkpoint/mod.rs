//! Checkpoint and resume of a machine's position and history.
//!
//! Behavior (state instances, guards) is not serializable, so a checkpoint
//! captures where the machine is and how it got there. Resuming means
//! rebuilding the machine with the same states and handing it a history
//! strategy restored from the checkpoint.

use crate::core::{HistoryEntry, StackHistory, StateId};
use crate::fsm::StateMachine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "D: Serialize", deserialize = "D: DeserializeOwned"))]
pub struct Checkpoint<K: StateId, D> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Current state of the machine
    pub current_state: K,

    /// History entries, oldest first
    pub history: Vec<HistoryEntry<K, D>>,
}

impl<K: StateId, D: Clone + 'static> Checkpoint<K, D> {
    /// Capture the current state and history of `machine`.
    pub fn capture(machine: &StateMachine<K, D>) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            current_state: machine.current_state_type().clone(),
            history: machine.history_snapshot(),
        }
    }

    /// Rebuild a stack history for a machine resumed on `current_state`.
    ///
    /// Installing the initial state of the resumed machine saves it again,
    /// so a trailing entry for the current state is left out.
    pub fn resume_history(&self, capacity: Option<usize>) -> StackHistory<K, D> {
        let mut entries = self.history.as_slice();
        if let Some((last, rest)) = entries.split_last() {
            if last.state == self.current_state {
                entries = rest;
            }
        }
        StackHistory::from_entries(entries.iter().cloned(), capacity)
    }
}

impl<K: StateId, D: Serialize + DeserializeOwned> Checkpoint<K, D> {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self).map_err(|e| CheckpointError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::Decode(e.to_string()))?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::Encode(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::Decode(e.to_string()))?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }
}

impl<K: StateId, D> Checkpoint<K, D> {
    /// Check that this checkpoint can be resumed by this version.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        if self.id.is_empty() {
            return Err(CheckpointError::Invalid("checkpoint id is empty".to_string()));
        }

        Ok(())
    }
}

impl<K: StateId, D: Clone + 'static> StateMachine<K, D> {
    /// Capture a checkpoint of this machine.
    pub fn checkpoint(&self) -> Checkpoint<K, D> {
        Checkpoint::capture(self)
    }
}
