//! A set of independently cycling lights

use crate::core::shutdown::CancellationToken;
use crate::core::sync::handle_mutex_poison;
use crate::light::{LightConfig, Phase, PhaseSnapshot, TrafficLight};
use crate::sim::error::{SimError, SimResult};
use crate::sim::vehicle::{Vehicle, VehicleHandle, WaitStrategy};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Phases of every light at one moment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionSnapshot {
    pub name: String,
    pub lights: Vec<PhaseSnapshot>,
}

impl IntersectionSnapshot {
    pub fn green_count(&self) -> usize {
        self.lights
            .iter()
            .filter(|light| light.phase == Phase::Green)
            .count()
    }
}

impl fmt::Display for IntersectionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for light in &self.lights {
            write!(f, " {}", light)?;
        }
        Ok(())
    }
}

pub struct Intersection {
    name: String,
    lights: Vec<Arc<TrafficLight>>,
    vehicles: Mutex<Vec<VehicleHandle>>,
    cancel: CancellationToken,
    stopped: AtomicBool,
}

impl Intersection {
    pub fn new(name: impl Into<String>, light_count: usize, config: LightConfig) -> SimResult<Self> {
        Self::with_cancellation(name, light_count, config, CancellationToken::new())
    }

    /// Build an intersection whose vehicles stop when `cancel` fires
    ///
    /// Lights keep cycling until `shutdown`; the token only ends vehicle loops.
    pub fn with_cancellation(
        name: impl Into<String>,
        light_count: usize,
        config: LightConfig,
        cancel: CancellationToken,
    ) -> SimResult<Self> {
        if light_count == 0 {
            return Err(SimError::NoLights);
        }

        let lights = (0..light_count)
            .map(|_| Arc::new(TrafficLight::with_config(config)))
            .collect();

        Ok(Self {
            name: name.into(),
            lights,
            vehicles: Mutex::new(Vec::new()),
            cancel,
            stopped: AtomicBool::new(false),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lights(&self) -> &[Arc<TrafficLight>] {
        &self.lights
    }

    pub fn light(&self, index: usize) -> Option<Arc<TrafficLight>> {
        self.lights.get(index).cloned()
    }

    fn vehicles(&self) -> SimResult<MutexGuard<'_, Vec<VehicleHandle>>> {
        handle_mutex_poison(self.vehicles.lock(), |message| SimError::Poisoned {
            message,
        })
    }

    /// Start every light
    pub fn simulate(&self) -> SimResult<()> {
        for light in &self.lights {
            light.simulate()?;
        }
        log::info!(
            "{}: {} lights cycling ({})",
            self.name,
            self.lights.len(),
            self.lights[0].interval()
        );
        Ok(())
    }

    /// Spawn `count` vehicles spread round-robin over the lights
    ///
    /// The first vehicle at each light takes transitions from its queue.
    /// Any further vehicles at the same light follow the broadcast signal,
    /// since a queue hands each transition to a single consumer.
    pub fn spawn_vehicles(&self, count: usize, crossings: Option<u64>) -> SimResult<()> {
        let mut vehicles = self.vehicles()?;
        let existing = vehicles.len();

        for offset in 0..count {
            let slot = existing + offset;
            let light = Arc::clone(&self.lights[slot % self.lights.len()]);
            let strategy = if slot < self.lights.len() {
                WaitStrategy::Queue
            } else {
                WaitStrategy::Broadcast
            };

            let handle = Vehicle::new(slot as u32 + 1, light)
                .with_strategy(strategy)
                .with_crossings(crossings)
                .start(self.cancel.clone())?;
            vehicles.push(handle);
        }

        if count > 0 {
            log::info!("{}: {} vehicles on the road", self.name, vehicles.len());
        }
        Ok(())
    }

    pub fn vehicle_count(&self) -> SimResult<usize> {
        Ok(self.vehicles()?.len())
    }

    pub fn snapshot(&self) -> IntersectionSnapshot {
        IntersectionSnapshot {
            name: self.name.clone(),
            lights: self.lights.iter().map(|light| light.snapshot()).collect(),
        }
    }

    /// Stop every light and vehicle; returns the total number of crossings
    ///
    /// All lights and vehicles are stopped even when one of them fails.
    /// The first failure is returned.
    pub fn shutdown(&self) -> SimResult<u64> {
        self.stopped.store(true, Ordering::Release);
        self.cancel.cancel();

        let mut first_error: Option<SimError> = None;
        for light in &self.lights {
            if let Err(e) = light.shutdown() {
                log::warn!("{}: {}", self.name, e);
                first_error.get_or_insert(e.into());
            }
        }

        let handles: Vec<VehicleHandle> = self.vehicles()?.drain(..).collect();
        let mut crossings = 0;
        for handle in handles {
            match handle.join() {
                Ok(count) => crossings += count,
                Err(e) => {
                    log::warn!("{}: {}", self.name, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        log::info!("{}: stopped after {} crossings", self.name, crossings);
        match first_error {
            Some(e) => Err(e),
            None => Ok(crossings),
        }
    }
}

impl fmt::Debug for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intersection")
            .field("name", &self.name)
            .field("lights", &self.lights)
            .finish()
    }
}

impl Drop for Intersection {
    fn drop(&mut self) {
        if self.stopped.load(Ordering::Acquire) {
            return;
        }
        if let Err(e) = self.shutdown() {
            log::warn!("{} did not shut down cleanly: {}", self.name, e);
        }
    }
}
