//! Tests for concurrent queue operations

#[cfg(test)]
mod tests {
    use crate::queue::api::{BlockingQueue, PopOrder};
    use std::collections::HashSet;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_pop_before_push_blocks_until_push() {
        let queue = Arc::new(BlockingQueue::new());
        let (started_tx, started_rx) = mpsc::channel();

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                started_tx.send(()).unwrap();
                let start = Instant::now();
                let value = queue.pop();
                (value, start.elapsed())
            })
        };

        started_rx.recv().unwrap();
        thread::sleep(Duration::from_millis(50));
        queue.push("green").unwrap();

        let (value, waited) = consumer.join().unwrap();
        assert_eq!(value, Ok("green"));
        assert!(
            waited >= Duration::from_millis(40),
            "pop returned before the push: {:?}",
            waited
        );
    }

    #[test]
    fn test_no_missed_wakeup_across_many_handoffs() {
        // Each round the consumer may or may not be waiting when the push lands
        let queue = Arc::new(BlockingQueue::with_order(PopOrder::Fifo));
        let rounds = 2_000;

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut received = Vec::with_capacity(rounds);
                for _ in 0..rounds {
                    received.push(queue.pop().unwrap());
                }
                received
            })
        };

        for i in 0..rounds {
            queue.push(i).unwrap();
            if i % 100 == 0 {
                thread::yield_now();
            }
        }

        let received = consumer.join().unwrap();
        assert_eq!(received, (0..rounds).collect::<Vec<_>>());
    }

    #[test]
    fn test_multiple_producers_and_consumers_deliver_each_value_once() {
        let queue = Arc::new(BlockingQueue::new());
        let producers = 4;
        let per_producer = 250;
        let consumers = 3;
        let total = producers * per_producer;

        let (result_tx, result_rx) = mpsc::channel();
        let mut handles = Vec::new();

        for _ in 0..consumers {
            let queue = Arc::clone(&queue);
            let result_tx = result_tx.clone();
            handles.push(thread::spawn(move || {
                while let Ok(value) = queue.pop() {
                    result_tx.send(value).unwrap();
                }
            }));
        }
        drop(result_tx);

        let producer_handles: Vec<_> = (0..producers)
            .map(|p| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..per_producer {
                        queue.push(p * per_producer + i).unwrap();
                    }
                })
            })
            .collect();

        for handle in producer_handles {
            handle.join().unwrap();
        }

        let mut seen = HashSet::new();
        for _ in 0..total {
            let value = result_rx
                .recv_timeout(Duration::from_secs(5))
                .expect("consumers stalled");
            assert!(seen.insert(value), "value {} delivered twice", value);
        }

        // Release the consumers blocked on the now-empty queue
        queue.close();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(seen.len(), total);
        assert!(result_rx.try_recv().is_err(), "extra values delivered");
        assert_eq!(queue.stats().pushed, total as u64);
        assert_eq!(queue.stats().popped, total as u64);
    }

    #[test]
    fn test_push_does_not_block_without_consumers() {
        let queue = BlockingQueue::new();
        let start = Instant::now();

        for i in 0..10_000 {
            queue.push(i).unwrap();
        }

        assert_eq!(queue.len(), 10_000);
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
