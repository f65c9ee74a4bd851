//! Intersection Simulation
//!
//! Drives several independent traffic lights and a set of vehicles that
//! wait for green at them.
//!
//! # Overview
//!
//! - **Intersection**: owns the lights, starts and stops them together and
//!   renders phase snapshots for reporting
//! - **Vehicle**: an agent thread that repeatedly waits for its light to
//!   turn green and counts its crossings
//! - **WaitStrategy**: a vehicle either consumes transitions from the
//!   light's queue or follows the light's broadcast signal
//!
//! Lights are not coordinated with each other; each one cycles on its
//! own random schedule.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use trafficlight::light::{CycleInterval, LightConfig};
//! use trafficlight::sim::Intersection;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LightConfig {
//!     interval: CycleInterval::from_millis(400, 600)?,
//!     ..LightConfig::default()
//! };
//! let intersection = Intersection::new("main-st", 2, config)?;
//! intersection.simulate()?;
//! intersection.spawn_vehicles(4, Some(3))?;
//!
//! println!("{}", intersection.snapshot());
//! let crossings = intersection.shutdown()?;
//! println!("{} crossings", crossings);
//! # Ok(())
//! # }
//! ```

mod error;
mod intersection;
mod vehicle;

pub mod api;

pub use error::{SimError, SimResult};
pub use intersection::{Intersection, IntersectionSnapshot};
pub use vehicle::{Vehicle, VehicleHandle, WaitStrategy};

#[cfg(test)]
mod tests;
