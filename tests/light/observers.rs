//! Queue consumers and broadcast watchers on running lights

use crate::common::fast_light_config;
use serial_test::serial;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use trafficlight::light::{LightError, Phase, PhaseCycler, TrafficLight};
use trafficlight::queue::PopOrder;

#[test]
#[serial]
fn test_waiter_sees_green_within_one_cycle() {
    let light = TrafficLight::with_config(fast_light_config(40, 60, PopOrder::Lifo));
    assert_eq!(light.current_phase(), Phase::Red);

    let start = Instant::now();
    light.simulate().unwrap();
    light.wait_for_green().unwrap();

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(40), "{:?}", elapsed);
    assert!(elapsed < Duration::from_millis(60 + 250), "{:?}", elapsed);
    light.shutdown().unwrap();
}

#[test]
#[serial]
fn test_fifo_light_delivers_every_transition_in_order() {
    let light = TrafficLight::with_config(fast_light_config(5, 10, PopOrder::Fifo));
    let mut watcher = light.watch();
    light.simulate().unwrap();

    // Let a backlog build up before consuming anything
    watcher.wait_for_timeout(Phase::Red, Duration::from_secs(5)).unwrap();
    watcher.wait_for_timeout(Phase::Red, Duration::from_secs(5)).unwrap();
    light.shutdown().unwrap();

    // Buffered transitions drain after shutdown; the first is always green
    let mut greens = 0;
    loop {
        match light.wait_for_green() {
            Ok(()) => greens += 1,
            Err(LightError::Cancelled { .. }) => break,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert!(greens >= 2, "only {} greens drained", greens);
    assert_eq!(greens as u64, (light.transitions() + 1) / 2);
}

#[test]
#[serial]
fn test_queue_waiter_and_watchers_coexist() {
    let light: Arc<PhaseCycler> =
        Arc::new(TrafficLight::with_config(fast_light_config(10, 20, PopOrder::Lifo)));

    let watchers: Vec<_> = (0..3)
        .map(|_| {
            let mut watcher = light.watch();
            thread::spawn(move || {
                for _ in 0..3 {
                    watcher
                        .wait_for_timeout(Phase::Green, Duration::from_secs(5))
                        .unwrap();
                }
                watcher.last_seen()
            })
        })
        .collect();

    let consumer = {
        let light = Arc::clone(&light);
        thread::spawn(move || {
            for _ in 0..3 {
                light.wait_for_green_timeout(Duration::from_secs(5)).unwrap();
            }
        })
    };

    light.simulate().unwrap();
    consumer.join().unwrap();
    for watcher in watchers {
        let last = watcher.join().unwrap();
        assert!(last >= 5 && last % 2 == 1, "last seen {}", last);
    }
    light.shutdown().unwrap();
}

#[test]
fn test_shutdown_releases_all_kinds_of_waiters() {
    let light = Arc::new(TrafficLight::with_config(fast_light_config(
        5_000,
        6_000,
        PopOrder::Lifo,
    )));
    light.simulate().unwrap();

    let queue_waiter = {
        let light = Arc::clone(&light);
        thread::spawn(move || light.wait_for_green())
    };
    let mut watcher = light.watch();
    let broadcast_waiter = thread::spawn(move || watcher.wait_for(Phase::Green));

    thread::sleep(Duration::from_millis(30));
    let start = Instant::now();
    light.shutdown().unwrap();

    assert!(matches!(
        queue_waiter.join().unwrap(),
        Err(LightError::Cancelled { .. })
    ));
    assert!(matches!(
        broadcast_waiter.join().unwrap(),
        Err(LightError::Cancelled { .. })
    ));
    assert!(start.elapsed() < Duration::from_secs(2));
}
