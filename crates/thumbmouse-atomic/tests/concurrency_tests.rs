//! Concurrency tests for thumbmouse-atomic.

use std::sync::Arc;
use std::thread;

use thumbmouse_atomic::PipelineCounters;

#[test]
fn test_timer_and_consumer_increment_concurrently() {
    let counters = Arc::new(PipelineCounters::new());
    let iterations: u64 = 10_000;

    let timer = {
        let counters = Arc::clone(&counters);
        thread::spawn(move || {
            for i in 0..iterations {
                if i % 4 == 0 {
                    counters.inc_permit_coalesced();
                } else {
                    counters.inc_permit_given();
                }
            }
        })
    };
    let consumer = {
        let counters = Arc::clone(&counters);
        thread::spawn(move || {
            for i in 0..iterations {
                counters.inc_cycle();
                counters.inc_report_emitted();
                counters.record_cycle_duration_us(i);
            }
        })
    };

    assert!(timer.join().is_ok(), "timer thread panicked");
    assert!(consumer.join().is_ok(), "consumer thread panicked");

    let snapshot = counters.snapshot();
    assert_eq!(snapshot.permits_given + snapshot.permits_coalesced, iterations);
    assert_eq!(snapshot.permits_coalesced, iterations / 4);
    assert_eq!(snapshot.cycles, iterations);
    assert_eq!(snapshot.reports_emitted, iterations);
    assert_eq!(snapshot.max_cycle_us, iterations - 1);
}

#[test]
fn test_many_writers_one_counter() {
    let counters = Arc::new(PipelineCounters::new());
    let num_threads: u64 = 8;
    let per_thread: u64 = 5_000;

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let counters = Arc::clone(&counters);
            thread::spawn(move || {
                for _ in 0..per_thread {
                    counters.inc_profile_switch();
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }

    assert_eq!(counters.snapshot().profile_switches, num_threads * per_thread);
}
