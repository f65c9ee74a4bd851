//! Type definitions for the queue system

use std::fmt;
use std::str::FromStr;

/// Order in which buffered values leave the queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PopOrder {
    /// Most recently pushed value first
    #[default]
    Lifo,
    /// Arrival order
    Fifo,
}

impl fmt::Display for PopOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopOrder::Lifo => write!(f, "lifo"),
            PopOrder::Fifo => write!(f, "fifo"),
        }
    }
}

impl FromStr for PopOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lifo" => Ok(PopOrder::Lifo),
            "fifo" => Ok(PopOrder::Fifo),
            other => Err(format!(
                "'{}' is not a valid pop order (expected 'lifo' or 'fifo')",
                other
            )),
        }
    }
}

/// Counters for a queue's lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStats {
    /// Values accepted by `push`
    pub pushed: u64,
    /// Values handed out by any pop variant or `drain`
    pub popped: u64,
    /// Values currently buffered
    pub buffered: usize,
    /// Whether `close` has been called
    pub closed: bool,
}
