//! Property-based tests for thumbmouse-atomic using quickcheck.

use quickcheck_macros::quickcheck;
use thumbmouse_atomic::{CounterSnapshot, PipelineCounters};

#[quickcheck]
fn prop_given_count_matches_increments(n: u8) -> bool {
    let counters = PipelineCounters::new();
    for _ in 0..n {
        counters.inc_permit_given();
    }
    counters.permits_given() == u64::from(n)
}

#[quickcheck]
fn prop_max_cycle_is_maximum(samples: Vec<u32>) -> bool {
    let counters = PipelineCounters::new();
    for &s in &samples {
        counters.record_cycle_duration_us(u64::from(s));
    }
    let expected = samples.iter().copied().max().map_or(0, u64::from);
    counters.snapshot().max_cycle_us == expected
}

#[quickcheck]
fn prop_coalesced_percent_bounded(given: u64, coalesced: u64) -> bool {
    let snapshot = CounterSnapshot {
        permits_given: given,
        permits_coalesced: coalesced,
        ..CounterSnapshot::default()
    };
    let pct = snapshot.coalesced_percent();
    (0.0..=100.0).contains(&pct)
}

#[quickcheck]
fn prop_reset_clears_everything(cycles: u8, emitted: u8) -> bool {
    let counters = PipelineCounters::new();
    for _ in 0..cycles {
        counters.inc_cycle();
    }
    for _ in 0..emitted {
        counters.inc_report_emitted();
    }
    let first = counters.snapshot_and_reset();
    first.cycles == u64::from(cycles)
        && first.reports_emitted == u64::from(emitted)
        && counters.snapshot() == CounterSnapshot::default()
}
