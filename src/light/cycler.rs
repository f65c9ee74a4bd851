//! TrafficLight - a phase-cycling actor
//!
//! Each light owns its current phase and runs a background thread that
//! flips the phase at randomized intervals. Every transition is pushed onto
//! the light's blocking queue (for `wait_for_green`) and published on its
//! phase signal (for watchers).

use crate::core::shutdown::CancellationToken;
use crate::core::sync::handle_mutex_poison;
use crate::light::error::{LightError, LightResult};
use crate::light::interval::CycleInterval;
use crate::light::phase::{AtomicPhase, LightId, Phase};
use crate::light::signal::{PhaseSignal, PhaseWatcher};
use crate::queue::{BlockingQueue, PopOrder, QueueError};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Construction parameters for a [`TrafficLight`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightConfig {
    pub interval: CycleInterval,
    pub pop_order: PopOrder,
}

/// Point-in-time view of a light, for rendering and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSnapshot {
    pub id: LightId,
    pub phase: Phase,
    pub transitions: u64,
}

impl fmt::Display for PhaseSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.id, self.phase)
    }
}

// State shared between the handle and the cycling thread
struct LightShared {
    id: LightId,
    current: AtomicPhase,
    queue: BlockingQueue<Phase>,
    signal: Arc<PhaseSignal>,
    interval: CycleInterval,
    cancel: CancellationToken,
}

impl LightShared {
    fn current_phase(&self) -> Phase {
        self.current.load()
    }

    fn set_current_phase(&self, phase: Phase) {
        self.current.store(phase);
    }

    /// Cycling loop
    ///
    /// A single-shot timer is armed with a fresh random duration after
    /// every firing. Cancellation interrupts the wait immediately.
    fn run(&self) {
        let mut rng = rand::rng();
        log::debug!("{} cycling every {}", self.id, self.interval);

        loop {
            let cycle = self.interval.draw(&mut rng);
            if self.cancel.wait_timeout(cycle) {
                break;
            }

            let next = self.current_phase().toggled();
            self.set_current_phase(next);

            if let Err(e) = self.queue.push(next) {
                log::warn!("{} could not publish {}: {}", self.id, next, e);
                break;
            }
            if let Err(e) = self.signal.publish(next) {
                log::warn!("{} could not signal {}: {}", self.id, next, e);
                break;
            }
            log::debug!("{} switched to {} after {}ms", self.id, next, cycle.as_millis());
        }

        self.queue.close();
        self.signal.close();
        log::debug!("{} cycling stopped", self.id);
    }
}

/// A single traffic light cycling between red and green on its own thread
///
/// The light starts red and idle. [`simulate`](Self::simulate) starts the
/// cycling thread; [`shutdown`](Self::shutdown) (or dropping the light)
/// stops and joins it.
///
/// [`wait_for_green`](Self::wait_for_green) consumes transitions from the
/// light's queue, so it is meant for one waiter per light. Use
/// [`watch`](Self::watch) when several threads wait on the same light.
///
/// # Example
///
/// ```rust,no_run
/// use trafficlight::light::{CycleInterval, Phase, TrafficLight};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let light = TrafficLight::with_interval(CycleInterval::from_millis(400, 600)?);
/// assert_eq!(light.current_phase(), Phase::Red);
///
/// light.simulate()?;
/// light.wait_for_green()?;
/// println!("{} is {}", light.id(), light.current_phase());
/// light.shutdown()?;
/// # Ok(())
/// # }
/// ```
pub struct TrafficLight {
    shared: Arc<LightShared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// Name kept for callers that think of the light as a phase cycler
pub type PhaseCycler = TrafficLight;

impl TrafficLight {
    pub fn new() -> Self {
        Self::with_config(LightConfig::default())
    }

    pub fn with_interval(interval: CycleInterval) -> Self {
        Self::with_config(LightConfig {
            interval,
            ..LightConfig::default()
        })
    }

    pub fn with_config(config: LightConfig) -> Self {
        let id = LightId::next();
        let initial = Phase::Red;
        Self {
            shared: Arc::new(LightShared {
                id,
                current: AtomicPhase::new(initial),
                queue: BlockingQueue::with_order(config.pop_order),
                signal: Arc::new(PhaseSignal::new(id, initial)),
                interval: config.interval,
                cancel: CancellationToken::new(),
            }),
            worker: Mutex::new(None),
        }
    }

    pub fn id(&self) -> LightId {
        self.shared.id
    }

    pub fn interval(&self) -> CycleInterval {
        self.shared.interval
    }

    /// Current phase; safe to call while the light is cycling
    pub fn current_phase(&self) -> Phase {
        self.shared.current_phase()
    }

    /// Number of transitions so far
    pub fn transitions(&self) -> u64 {
        self.shared.signal.current().1
    }

    pub fn snapshot(&self) -> PhaseSnapshot {
        PhaseSnapshot {
            id: self.id(),
            phase: self.current_phase(),
            transitions: self.transitions(),
        }
    }

    fn worker(&self) -> LightResult<MutexGuard<'_, Option<JoinHandle<()>>>> {
        handle_mutex_poison(self.worker.lock(), |message| LightError::Poisoned {
            message,
        })
    }

    pub fn is_running(&self) -> LightResult<bool> {
        Ok(self.worker()?.is_some() && !self.shared.cancel.is_cancelled())
    }

    /// Start the cycling thread
    ///
    /// A light runs at most once: calling this while it runs fails with
    /// `AlreadyRunning`, and after shutdown with `Cancelled`.
    pub fn simulate(&self) -> LightResult<()> {
        let mut worker = self.worker()?;
        if self.shared.cancel.is_cancelled() {
            return Err(LightError::Cancelled { id: self.id() });
        }
        if worker.is_some() {
            return Err(LightError::AlreadyRunning { id: self.id() });
        }

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name(self.id().to_string())
            .spawn(move || shared.run())
            .map_err(LightError::Spawn)?;
        *worker = Some(handle);

        log::info!("{} started ({})", self.id(), self.shared.interval);
        Ok(())
    }

    /// Block until the light turns green
    ///
    /// Pops transitions off the light's queue, discarding red ones. Fails
    /// with `Cancelled` once the light is shut down.
    pub fn wait_for_green(&self) -> LightResult<()> {
        loop {
            match self.shared.queue.pop() {
                Ok(Phase::Green) => return Ok(()),
                Ok(Phase::Red) => continue,
                Err(QueueError::Closed) => return Err(LightError::Cancelled { id: self.id() }),
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// [`wait_for_green`](Self::wait_for_green) with an overall deadline
    ///
    /// A timeout too large to express as a deadline waits without one.
    pub fn wait_for_green_timeout(&self, timeout: Duration) -> LightResult<()> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait_for_green();
        };
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.shared.queue.pop_timeout(remaining) {
                Ok(Phase::Green) => return Ok(()),
                Ok(Phase::Red) => continue,
                Err(QueueError::Closed) => return Err(LightError::Cancelled { id: self.id() }),
                Err(QueueError::Timeout { .. }) => {
                    return Err(LightError::Timeout {
                        id: self.id(),
                        target: Phase::Green,
                        waited_ms: timeout.as_millis() as u64,
                    })
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Observer that sees every transition without consuming queue values
    pub fn watch(&self) -> PhaseWatcher {
        PhaseWatcher::new(Arc::clone(&self.shared.signal))
    }

    /// Stop the cycling thread and release every waiter
    ///
    /// Idempotent. Blocked `wait_for_green` calls and watchers fail with
    /// `Cancelled`.
    pub fn shutdown(&self) -> LightResult<()> {
        self.shared.cancel.cancel();
        let handle = self.worker()?.take();

        let joined = match handle {
            Some(handle) => {
                let result = handle
                    .join()
                    .map_err(|_| LightError::ThreadPanicked { id: self.id() });
                log::info!(
                    "{} stopped after {} transitions",
                    self.id(),
                    self.transitions()
                );
                result
            }
            None => Ok(()),
        };

        // The loop closes these itself; repeat for lights that never ran or panicked
        self.shared.queue.close();
        self.shared.signal.close();
        joined
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrafficLight")
            .field("id", &self.id())
            .field("phase", &self.current_phase())
            .field("interval", &self.shared.interval)
            .field("queue", &self.shared.queue)
            .finish()
    }
}

impl Drop for TrafficLight {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::warn!("{} did not shut down cleanly: {}", self.id(), e);
        }
    }
}
