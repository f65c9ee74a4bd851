//! Tests for Intersection

#[cfg(test)]
mod tests {
    use super::super::fast_config;
    use crate::core::shutdown::CancellationToken;
    use crate::light::api::{LightConfig, LightError, Phase};
    use crate::sim::api::{Intersection, SimError};
    use serial_test::serial;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_new_rejects_zero_lights() {
        let result = Intersection::new("empty", 0, LightConfig::default());
        assert!(matches!(result, Err(SimError::NoLights)));
    }

    #[test]
    fn test_new_builds_red_lights_with_distinct_ids() {
        let intersection = Intersection::new("main-st", 3, LightConfig::default()).unwrap();

        assert_eq!(intersection.name(), "main-st");
        assert_eq!(intersection.lights().len(), 3);
        assert!(intersection.light(3).is_none());

        let snapshot = intersection.snapshot();
        assert!(snapshot.lights.iter().all(|light| light.phase == Phase::Red));
        assert_eq!(snapshot.green_count(), 0);
        assert_ne!(snapshot.lights[0].id, snapshot.lights[1].id);
        assert_ne!(snapshot.lights[1].id, snapshot.lights[2].id);
    }

    #[test]
    fn test_snapshot_display() {
        let intersection = Intersection::new("oak-ave", 2, LightConfig::default()).unwrap();
        let snapshot = intersection.snapshot();

        let expected = format!(
            "oak-ave: {}=red {}=red",
            snapshot.lights[0].id, snapshot.lights[1].id
        );
        assert_eq!(snapshot.to_string(), expected);
    }

    #[test]
    fn test_simulate_starts_every_light() {
        let intersection = Intersection::new("main-st", 2, fast_config(1_000, 2_000)).unwrap();
        intersection.simulate().unwrap();

        for light in intersection.lights() {
            assert!(light.is_running().unwrap());
        }

        // Lights refuse a second start
        assert!(matches!(
            intersection.simulate(),
            Err(SimError::Light(LightError::AlreadyRunning { .. }))
        ));
        intersection.shutdown().unwrap();
    }

    #[test]
    #[serial]
    fn test_vehicles_cross_and_shutdown_reports_total() {
        let intersection = Intersection::new("main-st", 2, fast_config(10, 20)).unwrap();
        intersection.simulate().unwrap();
        intersection.spawn_vehicles(4, Some(2)).unwrap();
        assert_eq!(intersection.vehicle_count().unwrap(), 4);

        // Each vehicle needs at most two greens, about four cycles
        thread::sleep(Duration::from_millis(400));
        let crossings = intersection.shutdown().unwrap();

        assert_eq!(crossings, 8);
        assert_eq!(intersection.vehicle_count().unwrap(), 0);
    }

    #[test]
    fn test_shutdown_releases_unlimited_vehicles_promptly() {
        let intersection = Intersection::new("main-st", 2, fast_config(5_000, 6_000)).unwrap();
        intersection.simulate().unwrap();
        intersection.spawn_vehicles(3, None).unwrap();

        thread::sleep(Duration::from_millis(20));
        let start = Instant::now();
        let crossings = intersection.shutdown().unwrap();

        assert_eq!(crossings, 0);
        assert!(start.elapsed() < Duration::from_secs(2));
        for light in intersection.lights() {
            assert!(!light.is_running().unwrap());
        }
    }

    #[test]
    #[serial]
    fn test_external_cancellation_stops_vehicles_and_drop_cleans_up() {
        let cancel = CancellationToken::new();
        let intersection =
            Intersection::with_cancellation("main-st", 1, fast_config(10, 20), cancel.clone())
                .unwrap();
        intersection.simulate().unwrap();
        intersection.spawn_vehicles(2, None).unwrap();

        thread::sleep(Duration::from_millis(100));
        cancel.cancel();
        // Each vehicle notices the token at its next green
        thread::sleep(Duration::from_millis(100));
        let light = intersection.light(0).unwrap();
        assert!(light.is_running().unwrap());

        drop(intersection);
        assert!(!light.is_running().unwrap());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let intersection = Intersection::new("main-st", 1, fast_config(1_000, 2_000)).unwrap();
        intersection.simulate().unwrap();

        assert_eq!(intersection.shutdown().unwrap(), 0);
        assert_eq!(intersection.shutdown().unwrap(), 0);
    }
}
