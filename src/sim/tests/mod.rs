//! Test modules for the intersection simulation

mod intersection;

use crate::light::api::{CycleInterval, LightConfig};

pub(super) fn fast_config(min_ms: u64, max_ms: u64) -> LightConfig {
    LightConfig {
        interval: CycleInterval::from_millis(min_ms, max_ms).unwrap(),
        ..LightConfig::default()
    }
}
