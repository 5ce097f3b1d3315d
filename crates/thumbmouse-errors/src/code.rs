//! Fixed error codes.
//!
//! These codes are the stable, allocation-free identity of every fault class.
//! They are what the consumer loop logs and what lifecycle calls hand back to
//! callers:
//! - `Copy` semantics, no heap allocations
//! - Fixed `#[repr(u8)]` representation
//! - Round-trippable through [`ErrorCode::from_code`]

use core::fmt;

use crate::common::ErrorSeverity;

/// Fixed error codes for the report pipeline.
///
/// # Examples
///
/// ```
/// use thumbmouse_errors::{ErrorCode, ErrorSeverity};
///
/// let code = ErrorCode::BusError;
/// assert_eq!(code.code(), 2);
/// assert_eq!(code.severity(), ErrorSeverity::Warning);
/// assert!(code.is_recoverable());
///
/// assert!(!ErrorCode::BadInstance.is_recoverable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    /// Collaborator handle is unusable (detached transport, failed init)
    BadInstance = 1,
    /// I2C transaction failed (NACK, timeout, arbitration loss)
    BusError = 2,
    /// Degenerate calibration or invalid configuration value
    ConfigurationFault = 3,
    /// Scheduler start requested while already running
    AlreadyRunning = 4,
    /// Scheduler stop requested while already stopped
    NotRunning = 5,
    /// HID transport refused a report without losing the device
    TransportFault = 6,
}

impl ErrorCode {
    /// Get the numeric error code.
    ///
    /// ```
    /// use thumbmouse_errors::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::BadInstance.code(), 1);
    /// assert_eq!(ErrorCode::NotRunning.code(), 5);
    /// ```
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up an error code from its numeric value.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ErrorCode::BadInstance),
            2 => Some(ErrorCode::BusError),
            3 => Some(ErrorCode::ConfigurationFault),
            4 => Some(ErrorCode::AlreadyRunning),
            5 => Some(ErrorCode::NotRunning),
            6 => Some(ErrorCode::TransportFault),
            _ => None,
        }
    }

    /// Get the error severity.
    pub fn severity(self) -> ErrorSeverity {
        match self {
            ErrorCode::BadInstance => ErrorSeverity::Critical,
            ErrorCode::BusError => ErrorSeverity::Warning,
            ErrorCode::ConfigurationFault => ErrorSeverity::Warning,
            ErrorCode::AlreadyRunning => ErrorSeverity::Error,
            ErrorCode::NotRunning => ErrorSeverity::Error,
            ErrorCode::TransportFault => ErrorSeverity::Warning,
        }
    }

    /// Check if the reporting loop may continue after this error.
    pub fn is_recoverable(self) -> bool {
        self.severity() < ErrorSeverity::Critical
    }

    /// Check if this error signals caller misuse rather than a runtime fault.
    pub fn is_programmer_error(self) -> bool {
        matches!(self, ErrorCode::AlreadyRunning | ErrorCode::NotRunning)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::BadInstance => write!(f, "Bad instance"),
            ErrorCode::BusError => write!(f, "Bus error"),
            ErrorCode::ConfigurationFault => write!(f, "Configuration fault"),
            ErrorCode::AlreadyRunning => write!(f, "Scheduler already running"),
            ErrorCode::NotRunning => write!(f, "Scheduler not running"),
            ErrorCode::TransportFault => write!(f, "Transport fault"),
        }
    }
}

impl std::error::Error for ErrorCode {}
