//! Common test utilities and helpers

use std::io::Write;
use trafficlight::light::{CycleInterval, LightConfig};
use trafficlight::queue::PopOrder;

/// Light settings with a short cycle so tests finish quickly
#[allow(dead_code)]
pub fn fast_light_config(min_ms: u64, max_ms: u64, pop_order: PopOrder) -> LightConfig {
    LightConfig {
        interval: CycleInterval::from_millis(min_ms, max_ms).expect("valid test interval"),
        pop_order,
    }
}

/// Write a TOML config file that lives as long as the returned handle
#[allow(dead_code)]
pub fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}
