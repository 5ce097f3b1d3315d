//! Top-level error type and classification.
//!
//! [`MouseError`] wraps every sub-error the pipeline can produce and maps each
//! one onto a fixed [`ErrorCode`], a coarse [`ErrorCategory`] and an
//! [`ErrorSeverity`].

use core::fmt;

use crate::{BusError, ErrorCode, ValidationError};

/// HID transport failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The HID endpoint is gone. No further report can be delivered.
    #[error("HID transport detached")]
    Detached,

    /// The endpoint refused this report but is still usable.
    #[error("HID transport rejected report: {0}")]
    Rejected(String),
}

impl TransportError {
    /// Create a rejected-report error.
    pub fn rejected(reason: impl Into<String>) -> Self {
        TransportError::Rejected(reason.into())
    }

    /// Fixed code for this transport failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            TransportError::Detached => ErrorCode::BadInstance,
            TransportError::Rejected(_) => ErrorCode::TransportFault,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        self.code().severity()
    }
}

/// Top-level error type for the report pipeline.
#[derive(Debug, thiserror::Error)]
pub enum MouseError {
    /// A collaborator handle is unusable
    #[error("Bad instance: {0}")]
    BadInstance(String),

    /// I2C bus errors
    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    /// Configuration validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Degenerate calibration hit at runtime
    #[error("Configuration fault: {0}")]
    ConfigurationFault(String),

    /// Scheduler start requested while running
    #[error("Report scheduler is already running")]
    AlreadyRunning,

    /// Scheduler stop requested while stopped
    #[error("Report scheduler is not running")]
    NotRunning,

    /// HID transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Bare error code without further context
    #[error("{0}")]
    Code(ErrorCode),
}

impl MouseError {
    /// Create a bad-instance error with a message.
    pub fn bad_instance(msg: impl Into<String>) -> Self {
        MouseError::BadInstance(msg.into())
    }

    /// Create a configuration fault with a message.
    pub fn configuration_fault(msg: impl Into<String>) -> Self {
        MouseError::ConfigurationFault(msg.into())
    }

    /// Get the fixed error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MouseError::BadInstance(_) => ErrorCode::BadInstance,
            MouseError::Bus(_) => ErrorCode::BusError,
            MouseError::Validation(_) => ErrorCode::ConfigurationFault,
            MouseError::ConfigurationFault(_) => ErrorCode::ConfigurationFault,
            MouseError::AlreadyRunning => ErrorCode::AlreadyRunning,
            MouseError::NotRunning => ErrorCode::NotRunning,
            MouseError::Transport(e) => e.code(),
            MouseError::Code(code) => *code,
        }
    }

    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            MouseError::BadInstance(_) => ErrorCategory::Instance,
            MouseError::Bus(_) => ErrorCategory::Bus,
            MouseError::Validation(_) => ErrorCategory::Validation,
            MouseError::ConfigurationFault(_) => ErrorCategory::Config,
            MouseError::AlreadyRunning | MouseError::NotRunning => ErrorCategory::Lifecycle,
            MouseError::Transport(_) => ErrorCategory::Transport,
            MouseError::Code(code) => ErrorCategory::from(*code),
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MouseError::Bus(e) => e.severity(),
            MouseError::Validation(e) => e.severity(),
            MouseError::Transport(e) => e.severity(),
            other => other.code().severity(),
        }
    }

    /// Check if the reporting loop may continue after this error.
    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::Critical
    }
}

impl From<ErrorCode> for MouseError {
    fn from(code: ErrorCode) -> Self {
        MouseError::Code(code)
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unusable collaborator handles
    Instance = 0,
    /// I2C bus errors
    Bus = 1,
    /// Runtime configuration faults
    Config = 2,
    /// Startup validation errors
    Validation = 3,
    /// Scheduler lifecycle misuse
    Lifecycle = 4,
    /// HID transport errors
    Transport = 5,
}

impl From<ErrorCode> for ErrorCategory {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::BadInstance => ErrorCategory::Instance,
            ErrorCode::BusError => ErrorCategory::Bus,
            ErrorCode::ConfigurationFault => ErrorCategory::Config,
            ErrorCode::AlreadyRunning | ErrorCode::NotRunning => ErrorCategory::Lifecycle,
            ErrorCode::TransportFault => ErrorCategory::Transport,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Instance => write!(f, "Instance"),
            ErrorCategory::Bus => write!(f, "Bus"),
            ErrorCategory::Config => write!(f, "Config"),
            ErrorCategory::Validation => write!(f, "Validation"),
            ErrorCategory::Lifecycle => write!(f, "Lifecycle"),
            ErrorCategory::Transport => write!(f, "Transport"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, the current cycle is lost
    Warning = 1,
    /// Error, the operation failed
    Error = 2,
    /// Critical, the calling context cannot continue
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
