//! I2C bus error types.
//!
//! A bus error is always recoverable: the consumer loop skips the current
//! cycle, waits a fixed backoff and samples again on the next permit.

use core::fmt;

use crate::common::ErrorSeverity;

/// Classified I2C transaction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusFaultKind {
    /// Device did not acknowledge its address or a data byte
    Nack,
    /// Transaction did not complete within the collaborator's timeout
    Timeout,
    /// Another controller won arbitration
    ArbitrationLoss,
    /// Misplaced start/stop condition or other electrical fault
    Bus,
    /// Receive buffer overrun
    Overrun,
    /// Anything the bus collaborator could not classify
    Other,
}

impl fmt::Display for BusFaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusFaultKind::Nack => write!(f, "NACK"),
            BusFaultKind::Timeout => write!(f, "timeout"),
            BusFaultKind::ArbitrationLoss => write!(f, "arbitration loss"),
            BusFaultKind::Bus => write!(f, "bus fault"),
            BusFaultKind::Overrun => write!(f, "overrun"),
            BusFaultKind::Other => write!(f, "unclassified fault"),
        }
    }
}

/// I2C transaction failure, optionally tagged with the register involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusError {
    /// Classified fault
    pub kind: BusFaultKind,
    /// First register of the failed transaction, when known
    pub register: Option<u8>,
}

impl BusError {
    /// Create a bus error without register information.
    pub fn new(kind: BusFaultKind) -> Self {
        Self {
            kind,
            register: None,
        }
    }

    /// Tag the error with the register the transaction addressed.
    pub fn at_register(mut self, register: u8) -> Self {
        self.register = Some(register);
        self
    }

    /// Bus errors never escalate past a warning.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Warning
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.register {
            Some(reg) => write!(f, "I2C {} at register {:#04x}", self.kind, reg),
            None => write!(f, "I2C {}", self.kind),
        }
    }
}

impl std::error::Error for BusError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_register() {
        let err = BusError::new(BusFaultKind::Nack);
        assert_eq!(err.to_string(), "I2C NACK");
    }

    #[test]
    fn test_display_with_register() {
        let err = BusError::new(BusFaultKind::Timeout).at_register(0x04);
        assert_eq!(err.to_string(), "I2C timeout at register 0x04");
    }

    #[test]
    fn test_bus_errors_are_warnings() {
        let err = BusError::new(BusFaultKind::ArbitrationLoss);
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }
}
