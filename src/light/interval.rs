//! Randomized cycle durations

use crate::light::error::{LightError, LightResult};
use rand::Rng;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_MIN_CYCLE_MS: u64 = 4000;
pub const DEFAULT_MAX_CYCLE_MS: u64 = 6000;

/// Half-open range `[min, max)` of whole-millisecond cycle durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleInterval {
    min_ms: u64,
    max_ms: u64,
}

impl CycleInterval {
    pub fn from_millis(min_ms: u64, max_ms: u64) -> LightResult<Self> {
        if min_ms == 0 {
            return Err(LightError::InvalidInterval {
                min_ms,
                max_ms,
                reason: "minimum cycle must be greater than 0ms".to_string(),
            });
        }
        if min_ms >= max_ms {
            return Err(LightError::InvalidInterval {
                min_ms,
                max_ms,
                reason: "maximum cycle must be greater than minimum cycle".to_string(),
            });
        }
        Ok(Self { min_ms, max_ms })
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    /// Uniform sample from `[min, max)`
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.random_range(self.min_ms..self.max_ms))
    }
}

impl Default for CycleInterval {
    fn default() -> Self {
        Self {
            min_ms: DEFAULT_MIN_CYCLE_MS,
            max_ms: DEFAULT_MAX_CYCLE_MS,
        }
    }
}

impl fmt::Display for CycleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}ms, {}ms)", self.min_ms, self.max_ms)
    }
}
