//! Checkpoint error types.

use thiserror::Error;

/// Errors raised while saving or loading a machine checkpoint
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The checkpoint could not be written as JSON or binary
    #[error("failed to encode checkpoint: {0}")]
    Encode(String),

    /// The input is not a checkpoint for this state and payload type
    #[error("failed to decode checkpoint: {0}")]
    Decode(String),

    #[error("unsupported checkpoint version {found}, this build reads version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The checkpoint decoded but cannot be resumed
    #[error("invalid checkpoint: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_context() {
        let err = CheckpointError::UnsupportedVersion {
            found: 2,
            supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "unsupported checkpoint version 2, this build reads version 1"
        );

        let err = CheckpointError::Invalid("checkpoint id is empty".to_string());
        assert_eq!(err.to_string(), "invalid checkpoint: checkpoint id is empty");
    }
}
