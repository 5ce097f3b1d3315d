//! Shared test utilities for thumbmouse.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with `#[track_caller]`
//! - [`mock`] - Scripted sources, recording transport and indicator
//! - [`i2c`] - Register-file I2C fake speaking the trackball's protocol
//! - [`prelude`] - Convenience re-exports
//!
//! Add to a crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! thumbmouse-test-helpers = { workspace = true }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]

pub mod i2c;
pub mod mock;
pub mod must;
pub mod prelude;

pub use must::*;
