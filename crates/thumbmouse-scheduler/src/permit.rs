//! Depth-one report permit.
//!
//! The timer gives, the consumer takes. A give that finds the slot occupied
//! is coalesced: at most one permit is ever outstanding, however far the
//! consumer falls behind.

use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use thumbmouse_atomic::PipelineCounters;

/// Create a connected giver/taker pair.
pub fn report_permit(counters: Arc<PipelineCounters>) -> (PermitGiver, PermitTaker) {
    let (tx, rx) = channel::bounded(1);
    (PermitGiver { tx, counters }, PermitTaker { rx })
}

/// Timer side of the permit. Never blocks.
#[derive(Debug, Clone)]
pub struct PermitGiver {
    tx: Sender<()>,
    counters: Arc<PipelineCounters>,
}

impl PermitGiver {
    /// Offer a permit. Returns `true` if the slot was empty.
    #[inline]
    pub fn give(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => {
                self.counters.inc_permit_given();
                true
            }
            Err(TrySendError::Full(())) => {
                self.counters.inc_permit_coalesced();
                false
            }
            Err(TrySendError::Disconnected(())) => false,
        }
    }
}

/// Outcome of waiting for a permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermitWait {
    /// A permit was taken.
    Granted,
    /// Nothing arrived in time.
    TimedOut,
    /// Every giver is gone.
    Closed,
}

impl PermitWait {
    /// Whether a permit was taken.
    pub fn is_granted(self) -> bool {
        self == PermitWait::Granted
    }
}

/// Consumer side of the permit.
#[derive(Debug)]
pub struct PermitTaker {
    rx: Receiver<()>,
}

impl PermitTaker {
    /// Wait up to `timeout` for a permit.
    pub fn wait(&self, timeout: Duration) -> PermitWait {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => PermitWait::Granted,
            Err(RecvTimeoutError::Timeout) => PermitWait::TimedOut,
            Err(RecvTimeoutError::Disconnected) => PermitWait::Closed,
        }
    }

    /// Take a permit if one is pending.
    pub fn try_take(&self) -> PermitWait {
        match self.rx.try_recv() {
            Ok(()) => PermitWait::Granted,
            Err(TryRecvError::Empty) => PermitWait::TimedOut,
            Err(TryRecvError::Disconnected) => PermitWait::Closed,
        }
    }

    /// Whether a permit is pending.
    pub fn is_pending(&self) -> bool {
        !self.rx.is_empty()
    }
}
