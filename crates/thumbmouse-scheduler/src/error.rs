//! Cycle failures and what the consumer does about them.

use thiserror::Error;
use thumbmouse_errors::{ErrorCode, MouseError, TransportError};
use thumbmouse_source::SourceError;

/// A report cycle that did not reach the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    /// Sampling failed.
    #[error("sample source failed: {0}")]
    Source(#[from] SourceError),

    /// The transport refused the report.
    #[error("HID transport failed: {0}")]
    Transport(#[from] TransportError),
}

/// Consumer reaction to a [`CycleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultAction {
    /// Skip this cycle only.
    Continue,
    /// Skip this cycle and sleep the bus backoff first.
    Backoff,
    /// End the consumer loop.
    Stop,
}

impl CycleError {
    /// Fixed code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            CycleError::Source(e) => e.code(),
            CycleError::Transport(e) => e.code(),
        }
    }

    /// What the consumer does next.
    pub fn action(&self) -> FaultAction {
        match self {
            CycleError::Source(SourceError::Bus(_)) => FaultAction::Backoff,
            CycleError::Source(SourceError::Unavailable(_)) => FaultAction::Backoff,
            CycleError::Transport(TransportError::Rejected(_)) => FaultAction::Continue,
            CycleError::Transport(TransportError::Detached) => FaultAction::Stop,
        }
    }
}

impl From<CycleError> for MouseError {
    fn from(err: CycleError) -> Self {
        match err {
            CycleError::Source(e) => e.into(),
            CycleError::Transport(e) => MouseError::Transport(e),
        }
    }
}
