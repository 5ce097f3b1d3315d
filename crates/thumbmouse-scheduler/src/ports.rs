//! Outbound HID transport boundary.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thumbmouse_errors::TransportError;
use tracing::trace;

/// What a transport did with an accepted report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Forwarded to the device
    Sent,
    /// Accepted and discarded
    Dropped,
}

/// Receives relative-motion reports.
///
/// The core clamps both deltas into `i8` before calling. `(0, 0)` is a
/// valid no-motion report; implementations may drop it.
pub trait HidTransport: Send {
    /// Send one relative-motion report.
    ///
    /// # Errors
    ///
    /// [`TransportError::Detached`] when the device is gone for good,
    /// [`TransportError::Rejected`] when only this report was refused.
    fn emit_relative_motion(&mut self, dx: i8, dy: i8) -> Result<Delivery, TransportError>;
}

impl<T: HidTransport + ?Sized> HidTransport for &mut T {
    fn emit_relative_motion(&mut self, dx: i8, dy: i8) -> Result<Delivery, TransportError> {
        (**self).emit_relative_motion(dx, dy)
    }
}

impl<T: HidTransport + ?Sized> HidTransport for Box<T> {
    fn emit_relative_motion(&mut self, dx: i8, dy: i8) -> Result<Delivery, TransportError> {
        (**self).emit_relative_motion(dx, dy)
    }
}

/// Cloneable switch for a [`GatedTransport`].
#[derive(Debug, Clone)]
pub struct TransportGate {
    enabled: Arc<AtomicBool>,
}

impl TransportGate {
    /// Let reports through, or swallow them.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// Whether reports go through.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

/// Transport wrapper with an enable flag and zero-report elision.
///
/// While disabled every report is accepted and dropped. Zero-motion
/// reports are dropped unless elision is turned off.
#[derive(Debug)]
pub struct GatedTransport<T> {
    inner: T,
    gate: TransportGate,
    elide_zero: bool,
}

impl<T: HidTransport> GatedTransport<T> {
    /// Enabled, eliding zero reports.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            gate: TransportGate {
                enabled: Arc::new(AtomicBool::new(true)),
            },
            elide_zero: true,
        }
    }

    /// Forward zero-motion reports too.
    #[must_use]
    pub fn keep_zero_reports(mut self) -> Self {
        self.elide_zero = false;
        self
    }

    /// Handle for toggling this transport from another context.
    pub fn gate(&self) -> TransportGate {
        self.gate.clone()
    }

    /// Unwrap.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: HidTransport> HidTransport for GatedTransport<T> {
    fn emit_relative_motion(&mut self, dx: i8, dy: i8) -> Result<Delivery, TransportError> {
        if !self.gate.is_enabled() {
            trace!(dx, dy, "transport disabled, report dropped");
            return Ok(Delivery::Dropped);
        }
        if self.elide_zero && dx == 0 && dy == 0 {
            return Ok(Delivery::Dropped);
        }
        self.inner.emit_relative_motion(dx, dy)
    }
}
