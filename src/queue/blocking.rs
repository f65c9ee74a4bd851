//! BlockingQueue implementation
//!
//! A mutex-guarded double-ended buffer paired with a condition variable.
//! Producers never block; consumers sleep on the condvar until a value is
//! available or the queue is closed.

use crate::core::sync::handle_mutex_poison;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::types::{PopOrder, QueueStats};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Unbounded blocking hand-off queue
///
/// Every pushed value is handed to exactly one consumer. Values are moved
/// in and out; the queue never clones them. Which buffered value a pop
/// returns depends on the queue's [`PopOrder`].
///
/// After [`close`](Self::close) no new values are accepted. Consumers still
/// drain what is buffered, then every pop fails with [`QueueError::Closed`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
/// use trafficlight::queue::BlockingQueue;
///
/// let queue = Arc::new(BlockingQueue::new());
/// let consumer = {
///     let queue = Arc::clone(&queue);
///     thread::spawn(move || queue.pop())
/// };
///
/// queue.push("green").unwrap();
/// assert_eq!(consumer.join().unwrap(), Ok("green"));
/// ```
pub struct BlockingQueue<T> {
    state: Mutex<QueueState<T>>,
    not_empty: Condvar,
    order: PopOrder,
    pushed: AtomicU64,
    popped: AtomicU64,
}

impl<T> BlockingQueue<T> {
    /// Create an empty queue with the default (LIFO) pop order
    pub fn new() -> Self {
        Self::with_order(PopOrder::default())
    }

    pub fn with_order(order: PopOrder) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            not_empty: Condvar::new(),
            order,
            pushed: AtomicU64::new(0),
            popped: AtomicU64::new(0),
        }
    }

    pub fn order(&self) -> PopOrder {
        self.order
    }

    fn lock(&self) -> QueueResult<MutexGuard<'_, QueueState<T>>> {
        handle_mutex_poison(self.state.lock(), |message| QueueError::Poisoned {
            message,
        })
    }

    // Counters and the closed flag stay valid even if a holder panicked
    fn lock_for_inspection(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take(&self, state: &mut QueueState<T>) -> Option<T> {
        let value = match self.order {
            PopOrder::Lifo => state.items.pop_back(),
            PopOrder::Fifo => state.items.pop_front(),
        };
        if value.is_some() {
            self.popped.fetch_add(1, Ordering::Relaxed);
        }
        value
    }

    /// Append a value and wake one waiting consumer
    ///
    /// Never blocks beyond the lock hand-off. Fails only once the queue has
    /// been closed, in which case the value is dropped.
    pub fn push(&self, value: T) -> QueueResult<()> {
        {
            let mut state = self.lock()?;
            if state.closed {
                return Err(QueueError::Closed);
            }
            state.items.push_back(value);
            self.pushed.fetch_add(1, Ordering::Relaxed);
        }
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove a value, blocking until one is available
    ///
    /// The lock is released while waiting and the emptiness check is
    /// repeated after every wake. Returns [`QueueError::Closed`] once the
    /// queue is closed and empty.
    pub fn pop(&self) -> QueueResult<T> {
        let mut state = self.lock()?;
        loop {
            if let Some(value) = self.take(&mut state) {
                return Ok(value);
            }
            if state.closed {
                return Err(QueueError::Closed);
            }
            state = handle_mutex_poison(self.not_empty.wait(state), |message| {
                QueueError::Poisoned { message }
            })?;
        }
    }

    /// Like [`pop`](Self::pop) but gives up after `timeout`
    ///
    /// A timeout too large to express as a deadline waits like `pop`.
    pub fn pop_timeout(&self, timeout: Duration) -> QueueResult<T> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.pop();
        };
        let mut state = self.lock()?;
        loop {
            if let Some(value) = self.take(&mut state) {
                return Ok(value);
            }
            if state.closed {
                return Err(QueueError::Closed);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(QueueError::Timeout {
                    waited_ms: timeout.as_millis() as u64,
                });
            }
            let (guard, _) = handle_mutex_poison(
                self.not_empty.wait_timeout(state, deadline - now),
                |message| QueueError::Poisoned { message },
            )?;
            state = guard;
        }
    }

    /// Remove a value if one is buffered, without blocking
    pub fn try_pop(&self) -> QueueResult<Option<T>> {
        let mut state = self.lock()?;
        match self.take(&mut state) {
            Some(value) => Ok(Some(value)),
            None if state.closed => Err(QueueError::Closed),
            None => Ok(None),
        }
    }

    /// Remove every buffered value, in pop order
    pub fn drain(&self) -> QueueResult<Vec<T>> {
        let mut state = self.lock()?;
        let mut drained = Vec::with_capacity(state.items.len());
        while let Some(value) = self.take(&mut state) {
            drained.push(value);
        }
        Ok(drained)
    }

    /// Stop accepting values and wake every blocked consumer
    ///
    /// Idempotent. Buffered values remain poppable.
    pub fn close(&self) {
        let mut state = self.lock_for_inspection();
        if state.closed {
            return;
        }
        state.closed = true;
        drop(state);
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock_for_inspection().closed
    }

    pub fn len(&self) -> usize {
        self.lock_for_inspection().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> QueueStats {
        let state = self.lock_for_inspection();
        QueueStats {
            pushed: self.pushed.load(Ordering::Relaxed),
            popped: self.popped.load(Ordering::Relaxed),
            buffered: state.items.len(),
            closed: state.closed,
        }
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BlockingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("BlockingQueue")
            .field("order", &self.order)
            .field("buffered", &stats.buffered)
            .field("closed", &stats.closed)
            .finish()
    }
}
