//! Public API for the intersection simulation

pub use crate::sim::intersection::{Intersection, IntersectionSnapshot};
pub use crate::sim::vehicle::{Vehicle, VehicleHandle, WaitStrategy};

// Error handling
pub use crate::sim::error::{SimError, SimResult};
