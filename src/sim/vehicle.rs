//! Vehicles waiting at a traffic light

use crate::core::shutdown::CancellationToken;
use crate::light::{LightError, Phase, TrafficLight};
use crate::sim::error::{SimError, SimResult};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// How a vehicle learns that its light turned green
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Consume transitions from the light's queue; one vehicle per light
    #[default]
    Queue,
    /// Follow the light's broadcast signal; any number per light
    Broadcast,
}

impl fmt::Display for WaitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitStrategy::Queue => write!(f, "queue"),
            WaitStrategy::Broadcast => write!(f, "broadcast"),
        }
    }
}

/// A vehicle bound to one light
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: u32,
    light: Arc<TrafficLight>,
    strategy: WaitStrategy,
    crossings: Option<u64>,
}

/// Running vehicle thread
#[derive(Debug)]
pub struct VehicleHandle {
    id: u32,
    handle: JoinHandle<u64>,
}

impl VehicleHandle {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the vehicle to stop; returns how many times it crossed
    pub fn join(self) -> SimResult<u64> {
        self.handle
            .join()
            .map_err(|_| SimError::VehiclePanicked { id: self.id })
    }
}

impl Vehicle {
    pub fn new(id: u32, light: Arc<TrafficLight>) -> Self {
        Self {
            id,
            light,
            strategy: WaitStrategy::default(),
            crossings: None,
        }
    }

    pub fn with_strategy(mut self, strategy: WaitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Stop after this many crossings; unlimited when `None`
    pub fn with_crossings(mut self, crossings: Option<u64>) -> Self {
        self.crossings = crossings;
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn strategy(&self) -> WaitStrategy {
        self.strategy
    }

    /// Spawn a queue-strategy vehicle
    ///
    /// Shorthand for `Vehicle::new(id, light).with_crossings(crossings).start(cancel)`.
    pub fn spawn(
        id: u32,
        light: Arc<TrafficLight>,
        crossings: Option<u64>,
        cancel: CancellationToken,
    ) -> SimResult<VehicleHandle> {
        Vehicle::new(id, light).with_crossings(crossings).start(cancel)
    }

    /// Run the vehicle on its own thread
    ///
    /// The token is checked between crossings. A vehicle blocked on its
    /// light is released when the light shuts down.
    pub fn start(self, cancel: CancellationToken) -> SimResult<VehicleHandle> {
        let id = self.id;
        let handle = thread::Builder::new()
            .name(format!("vehicle-{}", id))
            .spawn(move || self.drive(&cancel))
            .map_err(|source| SimError::Spawn { id, source })?;
        Ok(VehicleHandle { id, handle })
    }

    fn drive(&self, cancel: &CancellationToken) -> u64 {
        let light_id = self.light.id();
        let mut watcher = match self.strategy {
            WaitStrategy::Broadcast => Some(self.light.watch()),
            WaitStrategy::Queue => None,
        };
        log::debug!("vehicle-{} waiting at {} ({})", self.id, light_id, self.strategy);

        let mut crossed = 0;
        while self.crossings.map_or(true, |limit| crossed < limit) {
            if cancel.is_cancelled() {
                break;
            }

            let result = match watcher.as_mut() {
                Some(watcher) => watcher.wait_for(Phase::Green),
                None => self.light.wait_for_green(),
            };

            match result {
                Ok(()) => {
                    crossed += 1;
                    log::debug!("vehicle-{} crossed {} (#{})", self.id, light_id, crossed);
                }
                Err(LightError::Cancelled { .. }) => break,
                Err(e) => {
                    log::warn!("vehicle-{} stopped waiting at {}: {}", self.id, light_id, e);
                    break;
                }
            }
        }

        log::debug!("vehicle-{} done after {} crossings", self.id, crossed);
        crossed
    }
}
