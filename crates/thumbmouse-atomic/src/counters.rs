//! Atomic counters for the report pipeline.
//!
//! Every increment is a single `fetch_add` with `Ordering::Relaxed`. The timer
//! context only ever touches the permit counters, so it never blocks on a
//! reader.

use core::sync::atomic::{AtomicU64, Ordering};

/// Counter snapshot returned by [`PipelineCounters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    /// Permits handed to the consumer by the timer
    pub permits_given: u64,
    /// Timer fires that found a permit already pending
    pub permits_coalesced: u64,
    /// Consumer cycles started (one per permit, or one per polling flush)
    pub cycles: u64,
    /// Cycles skipped because of a fault
    pub skipped_cycles: u64,
    /// Reports forwarded to the HID device
    pub reports_emitted: u64,
    /// Reports accepted by the transport but not forwarded (gate closed or
    /// zero motion elided)
    pub reports_dropped: u64,
    /// I2C bus errors observed by the sample source
    pub bus_errors: u64,
    /// Degenerate calibration hits in the axis mapper
    pub config_faults: u64,
    /// Reports refused by the HID transport
    pub transport_errors: u64,
    /// Shaping profile changes
    pub profile_switches: u64,
    /// Longest consumer cycle in microseconds
    pub max_cycle_us: u64,
}

impl CounterSnapshot {
    /// Fraction of timer fires that were coalesced, in percent.
    ///
    /// Returns 0.0 if the timer never fired.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "percentages tolerate rounding")]
    pub fn coalesced_percent(&self) -> f64 {
        let fires = self.permits_given.saturating_add(self.permits_coalesced);
        if fires == 0 {
            return 0.0;
        }
        (self.permits_coalesced as f64 / fires as f64) * 100.0
    }
}

/// Shared lock-free counters.
///
/// Share behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct PipelineCounters {
    permits_given: AtomicU64,
    permits_coalesced: AtomicU64,
    cycles: AtomicU64,
    skipped_cycles: AtomicU64,
    reports_emitted: AtomicU64,
    reports_dropped: AtomicU64,
    bus_errors: AtomicU64,
    config_faults: AtomicU64,
    transport_errors: AtomicU64,
    profile_switches: AtomicU64,
    max_cycle_us: AtomicU64,
}

impl Default for PipelineCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineCounters {
    /// Create a new set of counters, all zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            permits_given: AtomicU64::new(0),
            permits_coalesced: AtomicU64::new(0),
            cycles: AtomicU64::new(0),
            skipped_cycles: AtomicU64::new(0),
            reports_emitted: AtomicU64::new(0),
            reports_dropped: AtomicU64::new(0),
            bus_errors: AtomicU64::new(0),
            config_faults: AtomicU64::new(0),
            transport_errors: AtomicU64::new(0),
            profile_switches: AtomicU64::new(0),
            max_cycle_us: AtomicU64::new(0),
        }
    }

    /// A permit was handed to the consumer.
    #[inline]
    pub fn inc_permit_given(&self) {
        self.permits_given.fetch_add(1, Ordering::Relaxed);
    }

    /// A timer fire found the permit slot already full.
    #[inline]
    pub fn inc_permit_coalesced(&self) {
        self.permits_coalesced.fetch_add(1, Ordering::Relaxed);
    }

    /// A consumer cycle started.
    #[inline]
    pub fn inc_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    /// A consumer cycle was abandoned.
    #[inline]
    pub fn inc_skipped_cycle(&self) {
        self.skipped_cycles.fetch_add(1, Ordering::Relaxed);
    }

    /// A report was forwarded to the HID device.
    #[inline]
    pub fn inc_report_emitted(&self) {
        self.reports_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// The transport accepted a report without forwarding it.
    #[inline]
    pub fn inc_report_dropped(&self) {
        self.reports_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// The sample source hit an I2C error.
    #[inline]
    pub fn inc_bus_error(&self) {
        self.bus_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// The axis mapper hit a degenerate segment.
    #[inline]
    pub fn inc_config_fault(&self) {
        self.config_faults.fetch_add(1, Ordering::Relaxed);
    }

    /// The HID transport refused a report.
    #[inline]
    pub fn inc_transport_error(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// The active shaping profile changed.
    #[inline]
    pub fn inc_profile_switch(&self) {
        self.profile_switches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how long one consumer cycle took. Only the maximum is kept.
    #[inline]
    pub fn record_cycle_duration_us(&self, micros: u64) {
        self.max_cycle_us.fetch_max(micros, Ordering::Relaxed);
    }

    /// Read all counters without resetting them.
    ///
    /// Each load is individually atomic; the snapshot as a whole is not.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            permits_given: self.permits_given.load(Ordering::Relaxed),
            permits_coalesced: self.permits_coalesced.load(Ordering::Relaxed),
            cycles: self.cycles.load(Ordering::Relaxed),
            skipped_cycles: self.skipped_cycles.load(Ordering::Relaxed),
            reports_emitted: self.reports_emitted.load(Ordering::Relaxed),
            reports_dropped: self.reports_dropped.load(Ordering::Relaxed),
            bus_errors: self.bus_errors.load(Ordering::Relaxed),
            config_faults: self.config_faults.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            profile_switches: self.profile_switches.load(Ordering::Relaxed),
            max_cycle_us: self.max_cycle_us.load(Ordering::Relaxed),
        }
    }

    /// Read all counters and reset them to zero.
    #[must_use]
    pub fn snapshot_and_reset(&self) -> CounterSnapshot {
        CounterSnapshot {
            permits_given: self.permits_given.swap(0, Ordering::Relaxed),
            permits_coalesced: self.permits_coalesced.swap(0, Ordering::Relaxed),
            cycles: self.cycles.swap(0, Ordering::Relaxed),
            skipped_cycles: self.skipped_cycles.swap(0, Ordering::Relaxed),
            reports_emitted: self.reports_emitted.swap(0, Ordering::Relaxed),
            reports_dropped: self.reports_dropped.swap(0, Ordering::Relaxed),
            bus_errors: self.bus_errors.swap(0, Ordering::Relaxed),
            config_faults: self.config_faults.swap(0, Ordering::Relaxed),
            transport_errors: self.transport_errors.swap(0, Ordering::Relaxed),
            profile_switches: self.profile_switches.swap(0, Ordering::Relaxed),
            max_cycle_us: self.max_cycle_us.swap(0, Ordering::Relaxed),
        }
    }

    /// Current number of emitted reports.
    #[inline]
    #[must_use]
    pub fn reports_emitted(&self) -> u64 {
        self.reports_emitted.load(Ordering::Relaxed)
    }

    /// Current number of permits given.
    #[inline]
    #[must_use]
    pub fn permits_given(&self) -> u64 {
        self.permits_given.load(Ordering::Relaxed)
    }

    /// Current number of consumer cycles.
    #[inline]
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }
}
