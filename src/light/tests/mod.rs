//! Test modules for traffic lights


use crate::light::api::{CycleInterval, LightConfig, TrafficLight};
use crate::queue::PopOrder;

/// Light with a short cycle so tests finish quickly
pub(super) fn fast_light(min_ms: u64, max_ms: u64) -> TrafficLight {
    TrafficLight::with_config(LightConfig {
        interval: CycleInterval::from_millis(min_ms, max_ms).unwrap(),
        pop_order: PopOrder::Lifo,
    })
}
