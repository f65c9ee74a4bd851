//! Versioned phase broadcast
//!
//! The blocking queue hands each transition to a single consumer. When
//! several observers all need to see every transition they wait on a
//! [`PhaseSignal`] instead: a phase plus a monotonically increasing
//! sequence number, with waiters comparing against the last sequence they
//! observed.

use crate::core::sync::handle_mutex_poison;
use crate::light::error::{LightError, LightResult};
use crate::light::phase::{LightId, Phase};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct SignalState {
    phase: Phase,
    sequence: u64,
    // Sequence of the most recent transition into each phase, indexed by Phase::index
    entered_at: [u64; 2],
    closed: bool,
}

#[derive(Debug)]
pub struct PhaseSignal {
    id: LightId,
    state: Mutex<SignalState>,
    changed: Condvar,
}

impl PhaseSignal {
    pub fn new(id: LightId, initial: Phase) -> Self {
        Self {
            id,
            state: Mutex::new(SignalState {
                phase: initial,
                sequence: 0,
                entered_at: [0; 2],
                closed: false,
            }),
            changed: Condvar::new(),
        }
    }

    fn lock(&self) -> LightResult<MutexGuard<'_, SignalState>> {
        handle_mutex_poison(self.state.lock(), |message| LightError::Poisoned {
            message,
        })
    }

    /// Record a transition and wake every waiter; returns its sequence number
    pub fn publish(&self, phase: Phase) -> LightResult<u64> {
        let sequence = {
            let mut state = self.lock()?;
            state.sequence += 1;
            state.phase = phase;
            state.entered_at[phase.index()] = state.sequence;
            state.sequence
        };
        self.changed.notify_all();
        Ok(sequence)
    }

    /// Latest phase and the number of transitions published so far
    pub fn current(&self) -> (Phase, u64) {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        (state.phase, state.sequence)
    }

    /// Wake all waiters; pending and future waits fail with `Cancelled`
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.closed = true;
        drop(state);
        self.changed.notify_all();
    }

    /// Block until a transition into `target` with sequence greater than
    /// `after` has been published
    ///
    /// A transition published before the waiter got the lock still counts,
    /// so a slow waiter never misses one. Returns the matching sequence.
    pub fn wait_for(
        &self,
        target: Phase,
        after: u64,
        timeout: Option<Duration>,
    ) -> LightResult<u64> {
        // Unrepresentable deadlines wait without one
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut state = self.lock()?;

        loop {
            let entered = state.entered_at[target.index()];
            if entered > after {
                return Ok(entered);
            }
            if state.closed {
                return Err(LightError::Cancelled { id: self.id });
            }

            state = match deadline {
                None => handle_mutex_poison(self.changed.wait(state), |message| {
                    LightError::Poisoned { message }
                })?,
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(LightError::Timeout {
                            id: self.id,
                            target,
                            waited_ms: timeout.map_or(0, |t| t.as_millis() as u64),
                        });
                    }
                    handle_mutex_poison(
                        self.changed.wait_timeout(state, deadline - now),
                        |message| LightError::Poisoned { message },
                    )?
                    .0
                }
            };
        }
    }
}

/// Observer handle over a light's [`PhaseSignal`]
///
/// Each watcher remembers the last transition it returned, so consecutive
/// `wait_for` calls report distinct transitions. Watchers never consume
/// anything: every watcher sees every transition.
#[derive(Debug, Clone)]
pub struct PhaseWatcher {
    signal: Arc<PhaseSignal>,
    seen: u64,
}

impl PhaseWatcher {
    pub(crate) fn new(signal: Arc<PhaseSignal>) -> Self {
        let (_, seen) = signal.current();
        Self { signal, seen }
    }

    /// Block until the next transition into `target`
    pub fn wait_for(&mut self, target: Phase) -> LightResult<()> {
        self.seen = self.signal.wait_for(target, self.seen, None)?;
        Ok(())
    }

    pub fn wait_for_timeout(&mut self, target: Phase, timeout: Duration) -> LightResult<()> {
        self.seen = self.signal.wait_for(target, self.seen, Some(timeout))?;
        Ok(())
    }

    /// Sequence number of the last transition this watcher returned
    pub fn last_seen(&self) -> u64 {
        self.seen
    }
}
