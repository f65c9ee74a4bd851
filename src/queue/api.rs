//! Public API for the queue system
//!
//! External modules should import from here rather than directly from
//! internal modules.

pub use crate::queue::blocking::BlockingQueue;

pub use crate::queue::types::{PopOrder, QueueStats};

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};
