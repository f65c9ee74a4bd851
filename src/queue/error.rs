//! Queue Error Types

use crate::core::error_handling::ContextualError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Queue is closed")]
    Closed,

    #[error("Timed out after {waited_ms}ms waiting for a value")]
    Timeout { waited_ms: u64 },

    #[error("Queue lock poisoned: {message}")]
    Poisoned { message: String },
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

impl ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}
