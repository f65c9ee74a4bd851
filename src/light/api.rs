//! Public API for traffic lights

pub use crate::light::cycler::{LightConfig, PhaseCycler, PhaseSnapshot, TrafficLight};
pub use crate::light::interval::CycleInterval;
pub use crate::light::phase::{LightId, Phase};
pub use crate::light::signal::{PhaseSignal, PhaseWatcher};

// Error handling
pub use crate::light::error::{LightError, LightResult};
