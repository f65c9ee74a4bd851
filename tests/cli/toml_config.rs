//! Configuration resolution tests
//!
//! Layering of defaults, TOML file and command line flags.

use crate::common::write_config;
use trafficlight::app::cli::api::{Args, ConfigError, SimulationConfig};
use trafficlight::queue::PopOrder;

fn args_with(config_file: &std::path::Path, extra: &[&str]) -> Args {
    let mut argv = vec![
        "trafficlight".to_string(),
        "--config-file".to_string(),
        config_file.to_string_lossy().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    Args::parse_from_args(&argv).unwrap()
}

#[tokio::test]
async fn test_toml_values_apply_when_flags_are_absent() {
    let config = write_config(
        r#"
        lights = 4
        vehicles = 12
        pop-order = "fifo"
        report-ms = 250
        "#,
    );

    let resolved = SimulationConfig::resolve(&args_with(config.path(), &[]))
        .await
        .unwrap();

    assert_eq!(resolved.lights, 4);
    assert_eq!(resolved.vehicles, 12);
    assert_eq!(resolved.pop_order, PopOrder::Fifo);
    assert_eq!(resolved.report_ms, 250);
    assert_eq!(resolved.min_cycle_ms, 4000);
}

#[tokio::test]
async fn test_flags_override_toml_values() {
    let config = write_config("lights = 4\npop-order = \"fifo\"\nlog-level = \"warn\"\n");

    let resolved = SimulationConfig::resolve(&args_with(
        config.path(),
        &["--lights", "1", "--pop-order", "lifo", "--log-level", "trace"],
    ))
    .await
    .unwrap();

    assert_eq!(resolved.lights, 1);
    assert_eq!(resolved.pop_order, PopOrder::Lifo);
    assert_eq!(resolved.log_level, "trace");
}

#[tokio::test]
async fn test_invalid_range_from_mixed_sources_is_rejected() {
    let config = write_config("min-cycle-ms = 300\n");

    let result = SimulationConfig::resolve(&args_with(config.path(), &["--max-cycle-ms", "200"])).await;

    match result {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "max-cycle-ms"),
        other => panic!("Expected Invalid, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_log_format_in_toml_is_rejected() {
    let config = write_config("log-format = \"xml\"\n");

    let result = SimulationConfig::resolve(&args_with(config.path(), &[])).await;
    assert!(matches!(result, Err(ConfigError::Invalid { ref field, .. }) if field == "log-format"));
}
