//! Traffic light error types

use crate::core::error_handling::ContextualError;
use crate::light::phase::{LightId, Phase};
use crate::queue::QueueError;

#[derive(Debug, thiserror::Error)]
pub enum LightError {
    #[error("{id} is already running")]
    AlreadyRunning { id: LightId },

    #[error("{id} has been shut down")]
    Cancelled { id: LightId },

    #[error("{id}: timed out after {waited_ms}ms waiting for {target}")]
    Timeout {
        id: LightId,
        target: Phase,
        waited_ms: u64,
    },

    #[error("Invalid cycle interval [{min_ms}ms, {max_ms}ms): {reason}")]
    InvalidInterval {
        min_ms: u64,
        max_ms: u64,
        reason: String,
    },

    #[error("Failed to spawn cycling thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("{id}: cycling thread panicked")]
    ThreadPanicked { id: LightId },

    #[error("Light lock poisoned: {message}")]
    Poisoned { message: String },

    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Result type for traffic light operations
pub type LightResult<T> = Result<T, LightError>;

impl ContextualError for LightError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, LightError::InvalidInterval { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            LightError::InvalidInterval { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_interval_is_user_actionable() {
        let err = LightError::InvalidInterval {
            min_ms: 10,
            max_ms: 5,
            reason: "maximum cycle must be greater than minimum cycle".to_string(),
        };

        assert!(err.is_user_actionable());
        assert_eq!(
            err.user_message(),
            Some("maximum cycle must be greater than minimum cycle")
        );
        assert!(err.to_string().starts_with("Invalid cycle interval [10ms, 5ms)"));
    }

    #[test]
    fn test_queue_errors_convert_transparently() {
        let err: LightError = QueueError::Closed.into();

        assert!(matches!(err, LightError::Queue(QueueError::Closed)));
        assert_eq!(err.to_string(), "Queue is closed");
        assert!(!err.is_user_actionable());
        assert_eq!(err.user_message(), None);
    }
}
