//! Mock collaborators for the report pipeline.
//!
//! Every mock is `Send` and cloneable; clones share state, so a test keeps a
//! handle for assertions after moving the other into a consumer thread.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use thumbmouse_errors::{MouseError, TransportError};
use thumbmouse_scheduler::{Delivery, HidTransport};
use thumbmouse_source::{
    AdcChannel, AnalogInput, IndicatorColor, IndicatorSink, RawSample, SampleSource, SourceError,
};

/// Sample source that replays a script, then repeats its fallback.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: Arc<Mutex<VecDeque<Result<RawSample, SourceError>>>>,
    fallback: RawSample,
    taken: Arc<AtomicUsize>,
}

impl ScriptedSource {
    /// Replay `samples`, then return `RawSample::ZERO` forever.
    pub fn new(samples: impl IntoIterator<Item = Result<RawSample, SourceError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(samples.into_iter().collect())),
            fallback: RawSample::ZERO,
            taken: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Return `sample` on every call.
    pub fn constant(sample: RawSample) -> Self {
        Self {
            fallback: sample,
            ..Self::new([])
        }
    }

    /// Replace the value returned once the script runs out.
    pub fn with_fallback(mut self, sample: RawSample) -> Self {
        self.fallback = sample;
        self
    }

    /// Append to the script.
    pub fn push(&self, item: Result<RawSample, SourceError>) {
        self.script.lock().push_back(item);
    }

    /// How many times `sample` was called.
    pub fn samples_taken(&self) -> usize {
        self.taken.load(Ordering::SeqCst)
    }
}

impl SampleSource for ScriptedSource {
    fn sample(&mut self) -> Result<RawSample, SourceError> {
        self.taken.fetch_add(1, Ordering::SeqCst);
        self.script.lock().pop_front().unwrap_or(Ok(self.fallback))
    }
}

/// ADC collaborator returning one value on every channel.
#[derive(Debug, Clone, Copy)]
pub struct ConstantAnalog(pub u16);

impl AnalogInput for ConstantAnalog {
    fn read_raw(&mut self, _channel: AdcChannel) -> u16 {
        self.0
    }
}

/// ADC collaborator cycling through per-channel value lists.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnalog {
    x: Vec<u16>,
    y: Vec<u16>,
    pos_x: usize,
    pos_y: usize,
}

impl ScriptedAnalog {
    /// Cycle `x` on the X channel and `y` on the Y channel.
    pub fn new(x: Vec<u16>, y: Vec<u16>) -> Self {
        Self {
            x,
            y,
            pos_x: 0,
            pos_y: 0,
        }
    }
}

impl AnalogInput for ScriptedAnalog {
    fn read_raw(&mut self, channel: AdcChannel) -> u16 {
        let (values, pos) = match channel {
            AdcChannel::X => (&self.x, &mut self.pos_x),
            AdcChannel::Y => (&self.y, &mut self.pos_y),
        };
        if values.is_empty() {
            return 0;
        }
        let value = values[*pos % values.len()];
        *pos += 1;
        value
    }
}

#[derive(Debug, Default)]
struct TransportState {
    reports: Vec<(i8, i8)>,
    failures: VecDeque<TransportError>,
    detach_after: Option<usize>,
}

/// HID transport recording every report it accepts.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<TransportState>>,
}

impl MockTransport {
    /// An attached transport that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse the next report with `err`.
    pub fn fail_next(&self, err: TransportError) {
        self.state.lock().failures.push_back(err);
    }

    /// Report `Detached` once `n` reports have been accepted.
    pub fn detach_after(&self, n: usize) {
        self.state.lock().detach_after = Some(n);
    }

    /// Accepted reports, oldest first.
    pub fn reports(&self) -> Vec<(i8, i8)> {
        self.state.lock().reports.clone()
    }

    /// Number of accepted reports.
    pub fn report_count(&self) -> usize {
        self.state.lock().reports.len()
    }
}

impl HidTransport for MockTransport {
    fn emit_relative_motion(&mut self, dx: i8, dy: i8) -> Result<Delivery, TransportError> {
        let mut state = self.state.lock();
        if state.detach_after.is_some_and(|n| state.reports.len() >= n) {
            return Err(TransportError::Detached);
        }
        if let Some(err) = state.failures.pop_front() {
            return Err(err);
        }
        state.reports.push((dx, dy));
        Ok(Delivery::Sent)
    }
}

/// Indicator recording every colour it is shown.
#[derive(Debug, Clone, Default)]
pub struct RecordingIndicator {
    colors: Arc<Mutex<Vec<IndicatorColor>>>,
    fail: Arc<Mutex<bool>>,
}

impl RecordingIndicator {
    /// A working indicator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `set_color` fail.
    pub fn set_failing(&self, failing: bool) {
        *self.fail.lock() = failing;
    }

    /// Colours shown so far, oldest first.
    pub fn colors(&self) -> Vec<IndicatorColor> {
        self.colors.lock().clone()
    }
}

impl IndicatorSink for RecordingIndicator {
    fn set_color(&mut self, color: IndicatorColor) -> thumbmouse_errors::Result<()> {
        if *self.fail.lock() {
            return Err(MouseError::bad_instance("indicator unplugged"));
        }
        self.colors.lock().push(color);
        Ok(())
    }
}
