//! Blocking Queue Component
//!
//! A generic hand-off queue between producer and consumer threads.
//!
//! # Overview
//!
//! - **Non-blocking push**: producers append and wake one waiting consumer
//! - **Blocking pop**: consumers sleep on a condition variable, never poll
//! - **Point-to-point**: each pushed value reaches exactly one consumer
//! - **Configurable order**: LIFO (default) or FIFO via [`PopOrder`]
//! - **Closable**: closing wakes every waiter so nothing hangs on teardown
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  push  ┌───────────────────────────────┐  pop   ┌────────────┐
//! │  Producer A  │───────▶│ Mutex<VecDeque<T>> + Condvar  │───────▶│ Consumer X │
//! └──────────────┘        │  ┌───┬───┬───┬───┐            │        └────────────┘
//! ┌──────────────┐  push  │  │ 1 │ 2 │ 3 │ 4 │ ◀─ LIFO    │  pop   ┌────────────┐
//! │  Producer B  │───────▶│  └───┴───┴───┴───┘            │───────▶│ Consumer Y │
//! └──────────────┘        └───────────────────────────────┘        └────────────┘
//! ```
//!
//! With several consumers on one queue a value goes to whichever consumer
//! wakes first. Observers that must all see every value should use a
//! broadcast primitive instead (see `light::PhaseSignal`).
//!
//! # Example Usage
//!
//! ```rust
//! use trafficlight::queue::{BlockingQueue, PopOrder, QueueError};
//!
//! let queue = BlockingQueue::with_order(PopOrder::Fifo);
//! queue.push(1).unwrap();
//! queue.push(2).unwrap();
//! assert_eq!(queue.pop(), Ok(1));
//!
//! queue.close();
//! assert_eq!(queue.pop(), Ok(2));
//! assert_eq!(queue.pop(), Err(QueueError::Closed));
//! ```

mod blocking;
mod error;
mod types;

pub mod api;

pub use blocking::BlockingQueue;
pub use error::{QueueError, QueueResult};
pub use types::{PopOrder, QueueStats};

#[cfg(test)]
mod tests;
