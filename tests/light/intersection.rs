//! Intersection runs through the public API

use crate::common::fast_light_config;
use serial_test::serial;
use std::thread;
use std::time::Duration;
use trafficlight::core::shutdown::CancellationToken;
use trafficlight::queue::PopOrder;
use trafficlight::sim::{Intersection, SimError, Vehicle};

#[test]
#[serial]
fn test_intersection_lights_cycle_independently() {
    let intersection =
        Intersection::new("elm-st", 3, fast_light_config(10, 30, PopOrder::Lifo)).unwrap();
    intersection.simulate().unwrap();

    thread::sleep(Duration::from_millis(300));
    let snapshot = intersection.snapshot();
    intersection.shutdown().unwrap();

    assert_eq!(snapshot.lights.len(), 3);
    assert!(snapshot.lights.iter().all(|light| light.transitions > 0));
    assert!(snapshot.to_string().starts_with("elm-st: light-"));
}

#[test]
#[serial]
fn test_vehicle_on_intersection_light() {
    let intersection =
        Intersection::new("elm-st", 1, fast_light_config(10, 20, PopOrder::Fifo)).unwrap();
    let light = intersection.light(0).unwrap();
    intersection.simulate().unwrap();

    let vehicle = Vehicle::spawn(1, light, Some(2), CancellationToken::new()).unwrap();
    assert_eq!(vehicle.join().unwrap(), 2);
    intersection.shutdown().unwrap();
}

#[test]
fn test_intersection_requires_a_light() {
    let result = Intersection::new("nowhere", 0, fast_light_config(10, 20, PopOrder::Lifo));
    assert!(matches!(result, Err(SimError::NoLights)));
}
