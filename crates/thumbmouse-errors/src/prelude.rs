//! Prelude module for convenient error handling imports.
//!
//! # Example
//!
//! ```
//! use thumbmouse_errors::prelude::*;
//! use thumbmouse_errors::validate;
//!
//! fn check_sign(sign: i8) -> Result<i8> {
//!     validate!(sign == 1 || sign == -1, ValidationError::out_of_range("sign", sign, -1, 1));
//!     Ok(sign)
//! }
//!
//! assert!(check_sign(-1).is_ok());
//! assert!(check_sign(0).is_err());
//! ```

pub use crate::{
    Result,
    bus::{BusError, BusFaultKind},
    code::ErrorCode,
    common::{ErrorCategory, ErrorSeverity, MouseError, TransportError},
    validation::ValidationError,
};

/// Return early with `$error` when `$condition` does not hold.
#[macro_export]
macro_rules! validate {
    ($condition:expr, $error:expr) => {
        if !$condition {
            return Err($error.into());
        }
    };
}
